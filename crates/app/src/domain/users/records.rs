//! User Records

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use pickflow::{auth::UserUuid, uuids::TypedUuid};
use serde::Serialize;
use sqlx::{FromRow, Row, postgres::PgRow};
use uuid::Uuid;

/// Role UUID
pub type RoleUuid = TypedUuid<RoleRecord>;

/// User Role UUID
pub type UserRoleUuid = TypedUuid<UserRoleRecord>;

/// User Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRecord {
    pub uuid: UserUuid,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub is_active: bool,
    pub roles: Vec<UserRoleRecord>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl UserRecord {
    /// Names of the roles the user holds.
    pub fn role_names(&self) -> Vec<&str> {
        self.roles.iter().map(|role| role.name.as_str()).collect()
    }
}

impl<'r> FromRow<'r, PgRow> for UserRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: UserUuid::from_uuid(row.try_get("uuid")?),
            username: row.try_get("username")?,
            email: row.try_get("email")?,
            full_name: row.try_get("full_name")?,
            is_active: row.try_get("is_active")?,
            roles: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}

/// A role held by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserRoleRecord {
    pub role_uuid: RoleUuid,
    pub name: String,
    pub description: String,
    /// `None` for roles granted by bootstrap or seeding.
    pub assigned_by: Option<UserUuid>,
    pub assigned_at: Timestamp,
}

impl<'r> FromRow<'r, PgRow> for UserRoleRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            role_uuid: RoleUuid::from_uuid(row.try_get("role_uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            assigned_by: row
                .try_get::<Option<Uuid>, _>("assigned_by")?
                .map(UserUuid::from_uuid),
            assigned_at: row.try_get::<SqlxTimestamp, _>("assigned_at")?.to_jiff(),
        })
    }
}

/// Role Record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleRecord {
    pub uuid: RoleUuid,
    pub name: String,
    pub description: String,
}

impl<'r> FromRow<'r, PgRow> for RoleRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: RoleUuid::from_uuid(row.try_get("uuid")?),
            name: row.try_get("name")?,
            description: row.try_get("description")?,
        })
    }
}
