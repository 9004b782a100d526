//! Roles Repository

use pickflow::roles::RoleDefinition;
use sqlx::{Postgres, Transaction, query, query_as};

use crate::domain::users::records::{RoleRecord, RoleUuid};

const GET_ROLE_BY_NAME_SQL: &str = include_str!("../sql/get_role_by_name.sql");
const LOCK_ROLE_BY_NAME_SQL: &str = include_str!("../sql/lock_role_by_name.sql");
const CREATE_ROLE_SQL: &str = include_str!("../sql/create_role.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgRolesRepository;

impl PgRolesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Option<RoleRecord>, sqlx::Error> {
        query_as::<Postgres, RoleRecord>(GET_ROLE_BY_NAME_SQL)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Find a role and hold its row lock until the transaction ends.
    pub(crate) async fn lock_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        name: &str,
    ) -> Result<Option<RoleRecord>, sqlx::Error> {
        query_as::<Postgres, RoleRecord>(LOCK_ROLE_BY_NAME_SQL)
            .bind(name)
            .fetch_optional(&mut **tx)
            .await
    }

    /// Insert a role unless one with the same name exists. Returns rows inserted.
    pub(crate) async fn create_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        role: &RoleDefinition,
    ) -> Result<u64, sqlx::Error> {
        let result = query(CREATE_ROLE_SQL)
            .bind(RoleUuid::new().into_uuid())
            .bind(role.name.as_str())
            .bind(role.description.as_str())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }
}
