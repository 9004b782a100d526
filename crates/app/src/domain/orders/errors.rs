//! Orders service errors.

use pickflow::{
    errors::FailureKind,
    orders::{IntakeError, TransitionError},
};
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("order already exists")]
    AlreadyExists,

    #[error("order not found")]
    NotFound,

    #[error("picker not found")]
    PickerNotFound,

    #[error("related resource not found")]
    InvalidReference,

    #[error("missing required data")]
    MissingRequiredData,

    #[error("invalid data")]
    InvalidData,

    #[error(transparent)]
    Transition(#[from] TransitionError),

    #[error(transparent)]
    Intake(#[from] IntakeError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl OrdersServiceError {
    /// Failure classification.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound | Self::PickerNotFound => FailureKind::NotFound,
            Self::AlreadyExists => FailureKind::Conflict,
            Self::InvalidReference | Self::MissingRequiredData | Self::InvalidData => {
                FailureKind::ValidationFailed
            }
            Self::Transition(error) => error.kind(),
            Self::Intake(error) => error.kind(),
            Self::Sql(_) => FailureKind::Storage,
        }
    }
}

impl From<Error> for OrdersServiceError {
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
