//! Failure Taxonomy

use std::fmt::{Display, Formatter, Result as FmtResult};

/// Coarse classification shared by every error in the workspace.
///
/// Callers branch on this instead of matching individual variants; all kinds
/// are terminal and none are retried internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// An entity or unique key does not exist.
    NotFound,

    /// A state machine guard rejected the transition.
    InvalidState,

    /// The acting user lacks the rank for the action.
    Forbidden,

    /// A unique key is already taken.
    Conflict,

    /// The input is malformed or would break an invariant.
    ValidationFailed,

    /// The backing store failed.
    Storage,
}

impl FailureKind {
    /// Stable snake-case name.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::InvalidState => "invalid_state",
            Self::Forbidden => "forbidden",
            Self::Conflict => "conflict",
            Self::ValidationFailed => "validation_failed",
            Self::Storage => "storage",
        }
    }
}

impl Display for FailureKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
