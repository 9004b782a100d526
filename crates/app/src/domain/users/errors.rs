//! Users service errors.

use pickflow::{auth::AuthorizationError, errors::FailureKind};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UsersServiceError {
    #[error("user already exists")]
    AlreadyExists,

    #[error("user not found")]
    NotFound,

    #[error("role '{0}' not found")]
    RoleNotFound(String),

    #[error("user does not hold role '{0}'")]
    RoleNotHeld(String),

    #[error("user already holds role '{0}'")]
    RoleAlreadyAssigned(String),

    #[error("role '{0}' is not part of the role hierarchy")]
    UnknownRole(String),

    #[error("a superadmin already exists")]
    SuperadminExists,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Unauthorized(#[from] AuthorizationError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl UsersServiceError {
    /// Failure classification.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound | Self::RoleNotFound(_) | Self::RoleNotHeld(_) => FailureKind::NotFound,
            Self::AlreadyExists | Self::RoleAlreadyAssigned(_) | Self::SuperadminExists => {
                FailureKind::Conflict
            }
            Self::UnknownRole(_)
            | Self::InvalidReference
            | Self::MissingRequiredData
            | Self::InvalidData => FailureKind::ValidationFailed,
            Self::Unauthorized(error) => error.kind(),
            Self::Sql(_) => FailureKind::Storage,
        }
    }
}

impl From<Error> for UsersServiceError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::UniqueViolation) => Self::AlreadyExists,
            Some(ErrorKind::ForeignKeyViolation) => Self::InvalidReference,
            Some(ErrorKind::NotNullViolation) => Self::MissingRequiredData,
            Some(ErrorKind::CheckViolation) => Self::InvalidData,
            _ => Self::Sql(error),
        }
    }
}
