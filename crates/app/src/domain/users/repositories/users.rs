//! Users Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use pickflow::auth::UserUuid;
use sqlx::{Postgres, Transaction, query, query_as, query_scalar};

use crate::domain::users::{
    data::{NewUser, ProfileUpdate},
    records::{RoleUuid, UserRecord, UserRoleRecord, UserRoleUuid},
};

const GET_USER_SQL: &str = include_str!("../sql/get_user.sql");
const LOCK_USER_SQL: &str = include_str!("../sql/lock_user.sql");
const USER_EXISTS_SQL: &str = include_str!("../sql/user_exists.sql");
const CREATE_USER_SQL: &str = include_str!("../sql/create_user.sql");
const SET_ACTIVE_SQL: &str = include_str!("../sql/set_active.sql");
const UPDATE_PROFILE_SQL: &str = include_str!("../sql/update_profile.sql");
const UPDATE_PASSWORD_SQL: &str = include_str!("../sql/update_password.sql");
const DELETE_USER_SQL: &str = include_str!("../sql/delete_user.sql");
const LIST_USER_ROLES_SQL: &str = include_str!("../sql/list_user_roles.sql");
const CREATE_USER_ROLE_SQL: &str = include_str!("../sql/create_user_role.sql");
const DELETE_USER_ROLE_SQL: &str = include_str!("../sql/delete_user_role.sql");
const DELETE_USER_ROLES_SQL: &str = include_str!("../sql/delete_user_roles.sql");
const ROLE_HOLDER_EXISTS_SQL: &str = include_str!("../sql/role_holder_exists.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgUsersRepository;

impl PgUsersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Live user with its roles.
    pub(crate) async fn get_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, UserRecord>(GET_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.roles = self.list_user_roles(tx, user).await?;

        Ok(record)
    }

    /// Live user with its roles, row-locked until the transaction ends.
    pub(crate) async fn lock_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<UserRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, UserRecord>(LOCK_USER_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await?;

        record.roles = self.list_user_roles(tx, user).await?;

        Ok(record)
    }

    pub(crate) async fn user_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(USER_EXISTS_SQL)
            .bind(user.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        new_user: &NewUser,
        now: Timestamp,
    ) -> Result<UserRecord, sqlx::Error> {
        query_as::<Postgres, UserRecord>(CREATE_USER_SQL)
            .bind(user.into_uuid())
            .bind(new_user.username.as_str())
            .bind(new_user.email.as_str())
            .bind(new_user.password_hash.as_str())
            .bind(new_user.full_name.as_str())
            .bind(new_user.is_active)
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_active(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        active: bool,
        now: Timestamp,
    ) -> Result<UserRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, UserRecord>(SET_ACTIVE_SQL)
            .bind(user.into_uuid())
            .bind(active)
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await?;

        record.roles = self.list_user_roles(tx, user).await?;

        Ok(record)
    }

    pub(crate) async fn update_profile(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        profile: &ProfileUpdate,
        now: Timestamp,
    ) -> Result<UserRecord, sqlx::Error> {
        let mut record = query_as::<Postgres, UserRecord>(UPDATE_PROFILE_SQL)
            .bind(user.into_uuid())
            .bind(profile.full_name())
            .bind(profile.email())
            .bind(SqlxTimestamp::from(now))
            .fetch_one(&mut **tx)
            .await?;

        record.roles = self.list_user_roles(tx, user).await?;

        Ok(record)
    }

    pub(crate) async fn update_password(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        password_hash: &str,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        let result = query(UPDATE_PASSWORD_SQL)
            .bind(user.into_uuid())
            .bind(password_hash)
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    /// Soft-delete the user and drop every role it holds.
    pub(crate) async fn delete_user(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        now: Timestamp,
    ) -> Result<u64, sqlx::Error> {
        query(DELETE_USER_ROLES_SQL)
            .bind(user.into_uuid())
            .execute(&mut **tx)
            .await?;

        let result = query(DELETE_USER_SQL)
            .bind(user.into_uuid())
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    pub(crate) async fn list_user_roles(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
    ) -> Result<Vec<UserRoleRecord>, sqlx::Error> {
        query_as::<Postgres, UserRoleRecord>(LIST_USER_ROLES_SQL)
            .bind(user.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn create_user_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        role: RoleUuid,
        assigned_by: Option<UserUuid>,
        now: Timestamp,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_USER_ROLE_SQL)
            .bind(UserRoleUuid::new().into_uuid())
            .bind(user.into_uuid())
            .bind(role.into_uuid())
            .bind(assigned_by.map(UserUuid::into_uuid))
            .bind(SqlxTimestamp::from(now))
            .execute(&mut **tx)
            .await?;

        Ok(())
    }

    pub(crate) async fn delete_user_role(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        user: UserUuid,
        role: RoleUuid,
    ) -> Result<u64, sqlx::Error> {
        let result = query(DELETE_USER_ROLE_SQL)
            .bind(user.into_uuid())
            .bind(role.into_uuid())
            .execute(&mut **tx)
            .await?;

        Ok(result.rows_affected())
    }

    /// Whether any live user holds the named role.
    pub(crate) async fn role_holder_exists(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        role: &str,
    ) -> Result<bool, sqlx::Error> {
        query_scalar::<Postgres, bool>(ROLE_HOLDER_EXISTS_SQL)
            .bind(role)
            .fetch_one(&mut **tx)
            .await
    }
}
