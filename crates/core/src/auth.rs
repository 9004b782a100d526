//! Authorization
//!
//! Rank-based permission checks. Role *assignment* uses `>=` so a role holder
//! can grant peers the same rank; user *management* uses strict `>` so peers
//! of equal rank cannot tamper with each other.

use smallvec::SmallVec;
use thiserror::Error;

use crate::{
    errors::FailureKind,
    roles::{Rank, RoleHierarchy},
    uuids::TypedUuid,
};

/// Marker for user identifiers.
#[derive(Debug)]
pub enum Operator {}

/// User UUID
pub type UserUuid = TypedUuid<Operator>;

/// The authenticated caller of a core operation.
///
/// Produced once at the authentication boundary and passed explicitly into
/// every operation that needs it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingUser {
    /// Caller's user id.
    pub uuid: UserUuid,

    /// Role names the caller holds.
    pub roles: SmallVec<[String; 2]>,
}

impl ActingUser {
    /// Create an acting user from a user id and role names.
    pub fn new<I, S>(uuid: UserUuid, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            uuid,
            roles: roles.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether the caller holds the named role directly.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|held| held == role)
    }
}

/// Authorization failures. All are [`FailureKind::Forbidden`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// The caller's rank is below the role being granted or revoked.
    #[error("insufficient rank to assign role '{role}'")]
    CannotAssignRole {
        /// Role being granted or revoked.
        role: String,
    },

    /// The caller does not strictly outrank the target user.
    #[error("insufficient rank to manage this user")]
    CannotManageUser,

    /// Users may never delete themselves.
    #[error("users cannot delete themselves")]
    SelfDeletion,

    /// The action requires at least the rank of the named role.
    #[error("'{action}' requires at least the rank of '{role}'")]
    RankRequired {
        /// Action attempted.
        action: &'static str,
        /// Role whose rank is required.
        role: &'static str,
    },

    /// The action is reserved to holders of specific roles.
    #[error("'{action}' requires one of the roles: {}", .roles.join(", "))]
    RoleRequired {
        /// Action attempted.
        action: &'static str,
        /// Roles that permit the action.
        roles: &'static [&'static str],
    },
}

impl AuthorizationError {
    /// Failure classification.
    pub const fn kind(&self) -> FailureKind {
        FailureKind::Forbidden
    }
}

/// Decides permit/deny for rank-gated actions.
#[derive(Debug, Clone)]
pub struct AuthorizationGuard<'h> {
    hierarchy: &'h RoleHierarchy,
}

impl<'h> AuthorizationGuard<'h> {
    /// Create a guard over a role hierarchy.
    pub const fn new(hierarchy: &'h RoleHierarchy) -> Self {
        Self { hierarchy }
    }

    /// Hierarchy the guard consults.
    pub const fn hierarchy(&self) -> &'h RoleHierarchy {
        self.hierarchy
    }

    /// Highest rank among the given roles, or [`Rank::NONE`].
    pub fn effective_rank<S: AsRef<str>>(&self, roles: &[S]) -> Rank {
        self.hierarchy.effective_rank(roles)
    }

    /// True iff `role` is known and the caller's rank is at least its rank.
    pub fn can_assign<S: AsRef<str>>(&self, acting_roles: &[S], role: &str) -> bool {
        self.hierarchy
            .rank(role)
            .is_some_and(|target| self.effective_rank(acting_roles) >= target)
    }

    /// True iff the caller's rank strictly exceeds the target user's rank.
    pub fn can_manage_user<S: AsRef<str>, T: AsRef<str>>(
        &self,
        acting_roles: &[S],
        target_roles: &[T],
    ) -> bool {
        self.effective_rank(acting_roles) > self.effective_rank(target_roles)
    }

    /// Check the caller may grant or revoke `role`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::CannotAssignRole`] when denied.
    pub fn authorize_role_assignment(
        &self,
        acting: &ActingUser,
        role: &str,
    ) -> Result<(), AuthorizationError> {
        if self.can_assign(acting.roles.as_slice(), role) {
            Ok(())
        } else {
            Err(AuthorizationError::CannotAssignRole {
                role: role.to_string(),
            })
        }
    }

    /// Check the caller may modify a user holding `target_roles`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::CannotManageUser`] when denied.
    pub fn authorize_user_management<T: AsRef<str>>(
        &self,
        acting: &ActingUser,
        target_roles: &[T],
    ) -> Result<(), AuthorizationError> {
        if self.can_manage_user(acting.roles.as_slice(), target_roles) {
            Ok(())
        } else {
            Err(AuthorizationError::CannotManageUser)
        }
    }

    /// Check the caller may delete the target user. Self-deletion is always
    /// rejected, regardless of rank.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::SelfDeletion`] or
    /// [`AuthorizationError::CannotManageUser`] when denied.
    pub fn authorize_user_deletion<T: AsRef<str>>(
        &self,
        acting: &ActingUser,
        target: UserUuid,
        target_roles: &[T],
    ) -> Result<(), AuthorizationError> {
        if acting.uuid == target {
            return Err(AuthorizationError::SelfDeletion);
        }

        self.authorize_user_management(acting, target_roles)
    }

    /// Check the caller's rank is at least that of `role`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::RankRequired`] when denied, including when
    /// `role` is not part of the hierarchy.
    pub fn require_rank(
        &self,
        acting: &ActingUser,
        role: &'static str,
        action: &'static str,
    ) -> Result<(), AuthorizationError> {
        if self.can_assign(acting.roles.as_slice(), role) {
            Ok(())
        } else {
            Err(AuthorizationError::RankRequired { action, role })
        }
    }

    /// Check the caller directly holds one of `roles`. Rank is not consulted.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorizationError::RoleRequired`] when denied.
    pub fn require_any_role(
        &self,
        acting: &ActingUser,
        roles: &'static [&'static str],
        action: &'static str,
    ) -> Result<(), AuthorizationError> {
        if roles.iter().any(|role| acting.has_role(role)) {
            Ok(())
        } else {
            Err(AuthorizationError::RoleRequired { action, roles })
        }
    }
}
