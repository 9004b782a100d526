//! Flows service errors.

use pickflow::{errors::FailureKind, flows::FlowError};
use sqlx::Error;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FlowsServiceError {
    #[error("no flow found for tracking '{0}'")]
    NotFound(String),

    #[error(transparent)]
    InvalidRequest(#[from] FlowError),

    #[error("storage error")]
    Sql(#[source] Error),
}

impl FlowsServiceError {
    /// Failure classification.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::NotFound(_) => FailureKind::NotFound,
            Self::InvalidRequest(error) => error.kind(),
            Self::Sql(_) => FailureKind::Storage,
        }
    }
}

impl From<Error> for FlowsServiceError {
    fn from(error: Error) -> Self {
        Self::Sql(error)
    }
}
