//! Users service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use pickflow::{
    auth::{ActingUser, AuthorizationGuard, UserUuid},
    roles::{RoleHierarchy, names},
};
use tracing::{Span, info};

use crate::{
    database::Db,
    domain::users::{
        data::{NewUser, ProfileUpdate},
        errors::UsersServiceError,
        records::UserRecord,
        repositories::{PgRolesRepository, PgUsersRepository},
    },
};

/// Postgres-backed [`UsersService`].
#[derive(Debug, Clone)]
pub struct PgUsersService {
    db: Db,
    hierarchy: Arc<RoleHierarchy>,
    users: PgUsersRepository,
    roles: PgRolesRepository,
}

impl PgUsersService {
    #[must_use]
    pub fn new(db: Db, hierarchy: Arc<RoleHierarchy>) -> Self {
        Self {
            db,
            hierarchy,
            users: PgUsersRepository::new(),
            roles: PgRolesRepository::new(),
        }
    }

    fn guard(&self) -> AuthorizationGuard<'_> {
        AuthorizationGuard::new(&self.hierarchy)
    }

    /// User administration is reserved to coordinator rank and above.
    fn require_coordinator(
        &self,
        acting: &ActingUser,
        action: &'static str,
    ) -> Result<(), UsersServiceError> {
        self.guard()
            .require_rank(acting, names::COORDINATOR, action)
            .map_err(UsersServiceError::from)
    }
}

#[async_trait]
impl UsersService for PgUsersService {
    async fn resolve_acting_user(&self, user: UserUuid) -> Result<ActingUser, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.users.get_user(&mut tx, user).await?;

        tx.commit().await?;

        if !record.is_active {
            return Err(UsersServiceError::NotFound);
        }

        Ok(ActingUser::new(
            record.uuid,
            record.roles.into_iter().map(|role| role.name),
        ))
    }

    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let record = self.users.get_user(&mut tx, user).await?;

        tx.commit().await?;

        Ok(record)
    }

    #[tracing::instrument(
        name = "users.service.create_user",
        skip(self, acting, user),
        fields(
            acting_uuid = %acting.uuid,
            user_uuid = tracing::field::Empty,
            role = tracing::field::Empty
        ),
        err
    )]
    async fn create_user(
        &self,
        acting: &ActingUser,
        user: NewUser,
    ) -> Result<UserRecord, UsersServiceError> {
        let role = match &user.initial_role {
            Some(role) if !self.hierarchy.contains(role) => {
                return Err(UsersServiceError::UnknownRole(role.clone()));
            }
            Some(role) => role.clone(),
            None => names::GUEST.to_string(),
        };

        self.require_coordinator(acting, "create_user")?;

        if user.initial_role.is_some() {
            self.guard().authorize_role_assignment(acting, &role)?;
        }

        let span = Span::current();

        span.record("role", tracing::field::display(&role));

        let now = Timestamp::now();
        let mut tx = self.db.begin().await?;

        let role_record = self
            .roles
            .find_role(&mut tx, &role)
            .await?
            .ok_or_else(|| UsersServiceError::RoleNotFound(role.clone()))?;

        let mut created = self
            .users
            .create_user(&mut tx, UserUuid::new(), &user, now)
            .await?;

        span.record("user_uuid", tracing::field::display(created.uuid));

        self.users
            .create_user_role(
                &mut tx,
                created.uuid,
                role_record.uuid,
                Some(acting.uuid),
                now,
            )
            .await?;

        created.roles = self.users.list_user_roles(&mut tx, created.uuid).await?;

        tx.commit().await?;

        info!(user_uuid = %created.uuid, role = %role, "created user");

        Ok(created)
    }

    #[tracing::instrument(
        name = "users.service.delete_user",
        skip(self, acting),
        fields(acting_uuid = %acting.uuid, user_uuid = %user),
        err
    )]
    async fn delete_user(
        &self,
        acting: &ActingUser,
        user: UserUuid,
    ) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let target = self.users.lock_user(&mut tx, user).await?;

        self.require_coordinator(acting, "delete_user")?;

        self.guard()
            .authorize_user_deletion(acting, target.uuid, &target.role_names())?;

        let rows_affected = self
            .users
            .delete_user(&mut tx, user, Timestamp::now())
            .await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        info!(user_uuid = %user, "deleted user");

        Ok(())
    }

    #[tracing::instrument(
        name = "users.service.reset_password",
        skip(self, acting, password_hash),
        fields(acting_uuid = %acting.uuid, user_uuid = %user),
        err
    )]
    async fn reset_password(
        &self,
        acting: &ActingUser,
        user: UserUuid,
        password_hash: String,
    ) -> Result<(), UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let target = self.users.lock_user(&mut tx, user).await?;

        self.guard()
            .authorize_user_management(acting, &target.role_names())?;

        let rows_affected = self
            .users
            .update_password(&mut tx, user, &password_hash, Timestamp::now())
            .await?;

        if rows_affected == 0 {
            return Err(UsersServiceError::NotFound);
        }

        tx.commit().await?;

        info!(user_uuid = %user, "reset password");

        Ok(())
    }

    #[tracing::instrument(
        name = "users.service.set_active",
        skip(self, acting),
        fields(acting_uuid = %acting.uuid, user_uuid = %user, active),
        err
    )]
    async fn set_active(
        &self,
        acting: &ActingUser,
        user: UserUuid,
        active: bool,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let target = self.users.lock_user(&mut tx, user).await?;

        self.require_coordinator(acting, "set_active")?;

        self.guard()
            .authorize_user_management(acting, &target.role_names())?;

        let updated = self
            .users
            .set_active(&mut tx, user, active, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(user_uuid = %user, active, "updated user activation");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "users.service.assign_role",
        skip(self, acting),
        fields(acting_uuid = %acting.uuid, user_uuid = %user, role = %role),
        err
    )]
    async fn assign_role(
        &self,
        acting: &ActingUser,
        user: UserUuid,
        role: &str,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut target = self.users.lock_user(&mut tx, user).await?;

        let role_record = self
            .roles
            .find_role(&mut tx, role)
            .await?
            .ok_or_else(|| UsersServiceError::RoleNotFound(role.to_string()))?;

        if target.roles.iter().any(|held| held.name == role) {
            return Err(UsersServiceError::RoleAlreadyAssigned(role.to_string()));
        }

        self.require_coordinator(acting, "assign_role")?;
        self.guard().authorize_role_assignment(acting, role)?;

        self.users
            .create_user_role(
                &mut tx,
                user,
                role_record.uuid,
                Some(acting.uuid),
                Timestamp::now(),
            )
            .await?;

        target.roles = self.users.list_user_roles(&mut tx, user).await?;

        tx.commit().await?;

        info!(user_uuid = %user, role = %role, "assigned role");

        Ok(target)
    }

    #[tracing::instrument(
        name = "users.service.remove_role",
        skip(self, acting),
        fields(acting_uuid = %acting.uuid, user_uuid = %user, role = %role),
        err
    )]
    async fn remove_role(
        &self,
        acting: &ActingUser,
        user: UserUuid,
        role: &str,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut target = self.users.lock_user(&mut tx, user).await?;

        let role_record = self
            .roles
            .find_role(&mut tx, role)
            .await?
            .ok_or_else(|| UsersServiceError::RoleNotFound(role.to_string()))?;

        if !target.roles.iter().any(|held| held.name == role) {
            return Err(UsersServiceError::RoleNotHeld(role.to_string()));
        }

        self.require_coordinator(acting, "remove_role")?;
        self.guard().authorize_role_assignment(acting, role)?;

        self.users
            .delete_user_role(&mut tx, user, role_record.uuid)
            .await?;

        target.roles = self.users.list_user_roles(&mut tx, user).await?;

        tx.commit().await?;

        info!(user_uuid = %user, role = %role, "removed role");

        Ok(target)
    }

    #[tracing::instrument(
        name = "users.service.update_profile",
        skip(self, acting, profile),
        fields(acting_uuid = %acting.uuid),
        err
    )]
    async fn update_profile(
        &self,
        acting: &ActingUser,
        profile: ProfileUpdate,
    ) -> Result<UserRecord, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        self.users.lock_user(&mut tx, acting.uuid).await?;

        let updated = self
            .users
            .update_profile(&mut tx, acting.uuid, &profile, Timestamp::now())
            .await?;

        tx.commit().await?;

        info!(user_uuid = %acting.uuid, "updated profile");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "users.service.seed_roles",
        skip(self),
        fields(inserted = tracing::field::Empty),
        err
    )]
    async fn seed_roles(&self) -> Result<u64, UsersServiceError> {
        let mut tx = self.db.begin().await?;

        let mut inserted = 0;

        for role in self.hierarchy.definitions() {
            inserted += self.roles.create_role(&mut tx, role).await?;
        }

        tx.commit().await?;

        Span::current().record("inserted", inserted);

        info!(inserted, "seeded roles");

        Ok(inserted)
    }

    #[tracing::instrument(
        name = "users.service.bootstrap_superadmin",
        skip(self, user),
        fields(user_uuid = tracing::field::Empty),
        err
    )]
    async fn bootstrap_superadmin(&self, user: NewUser) -> Result<UserRecord, UsersServiceError> {
        let now = Timestamp::now();
        let mut tx = self.db.begin().await?;

        // Serialises concurrent bootstraps on the role row.
        let role = self
            .roles
            .lock_role(&mut tx, names::SUPERADMIN)
            .await?
            .ok_or_else(|| UsersServiceError::RoleNotFound(names::SUPERADMIN.to_string()))?;

        if self
            .users
            .role_holder_exists(&mut tx, names::SUPERADMIN)
            .await?
        {
            return Err(UsersServiceError::SuperadminExists);
        }

        let mut created = self
            .users
            .create_user(&mut tx, UserUuid::new(), &user, now)
            .await?;

        Span::current().record("user_uuid", tracing::field::display(created.uuid));

        self.users
            .create_user_role(&mut tx, created.uuid, role.uuid, None, now)
            .await?;

        created.roles = self.users.list_user_roles(&mut tx, created.uuid).await?;

        tx.commit().await?;

        info!(user_uuid = %created.uuid, "bootstrapped superadmin");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait UsersService: Send + Sync {
    /// Builds the acting user for a live, active user.
    async fn resolve_acting_user(&self, user: UserUuid) -> Result<ActingUser, UsersServiceError>;

    /// Retrieve a single user with its roles.
    async fn get_user(&self, user: UserUuid) -> Result<UserRecord, UsersServiceError>;

    /// Creates a user holding its initial role, or `guest` when none is given.
    async fn create_user(
        &self,
        acting: &ActingUser,
        user: NewUser,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Soft-deletes a user and drops its roles.
    async fn delete_user(
        &self,
        acting: &ActingUser,
        user: UserUuid,
    ) -> Result<(), UsersServiceError>;

    /// Replaces a user's password hash.
    async fn reset_password(
        &self,
        acting: &ActingUser,
        user: UserUuid,
        password_hash: String,
    ) -> Result<(), UsersServiceError>;

    /// Activates or deactivates a user.
    async fn set_active(
        &self,
        acting: &ActingUser,
        user: UserUuid,
        active: bool,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Grants a role to a user.
    async fn assign_role(
        &self,
        acting: &ActingUser,
        user: UserUuid,
        role: &str,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Revokes a role from a user.
    async fn remove_role(
        &self,
        acting: &ActingUser,
        user: UserUuid,
        role: &str,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Updates the acting user's own full name and email.
    async fn update_profile(
        &self,
        acting: &ActingUser,
        profile: ProfileUpdate,
    ) -> Result<UserRecord, UsersServiceError>;

    /// Inserts every hierarchy role missing from storage. Returns the number inserted.
    async fn seed_roles(&self) -> Result<u64, UsersServiceError>;

    /// Creates the first superadmin. Fails once any live user holds that role.
    async fn bootstrap_superadmin(&self, user: NewUser) -> Result<UserRecord, UsersServiceError>;
}

#[cfg(test)]
mod tests {
    use pickflow::errors::FailureKind;
    use testresult::TestResult;

    use crate::test::{TestContext, helpers::new_user};

    use super::*;

    #[tokio::test]
    async fn seeding_roles_is_idempotent() -> TestResult {
        let ctx = TestContext::new().await;

        let inserted = ctx.users.seed_roles().await?;

        assert_eq!(inserted, 0, "roles were already seeded by the fixture");

        Ok(())
    }

    #[tokio::test]
    async fn second_superadmin_bootstrap_conflicts() {
        let ctx = TestContext::new().await;

        let result = ctx.users.bootstrap_superadmin(new_user("root2", None)).await;

        assert!(
            matches!(result, Err(UsersServiceError::SuperadminExists)),
            "expected SuperadminExists, got {result:?}"
        );
    }

    #[tokio::test]
    async fn create_user_without_role_grants_guest() -> TestResult {
        let ctx = TestContext::new().await;

        let user = ctx
            .users
            .create_user(&ctx.superadmin, new_user("ani", None))
            .await?;

        assert_eq!(user.role_names(), vec![names::GUEST]);
        assert_eq!(
            user.roles.first().and_then(|role| role.assigned_by),
            Some(ctx.superadmin.uuid)
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_user_with_unknown_role_is_rejected() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .create_user(&ctx.superadmin, new_user("ani", Some("janitor")))
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::UnknownRole(_))),
            "expected UnknownRole, got {result:?}"
        );
    }

    #[tokio::test]
    async fn coordinator_cannot_create_superadmin() -> TestResult {
        let ctx = TestContext::new().await;
        let coordinator = ctx.user_with_role("coord", names::COORDINATOR).await?;

        let result = ctx
            .users
            .create_user(&coordinator, new_user("boss", Some(names::SUPERADMIN)))
            .await;

        assert_eq!(
            result.map_err(|error| error.kind()).err(),
            Some(FailureKind::Forbidden)
        );

        Ok(())
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() -> TestResult {
        let ctx = TestContext::new().await;

        ctx.users
            .create_user(&ctx.superadmin, new_user("ani", None))
            .await?;

        let result = ctx
            .users
            .create_user(&ctx.superadmin, new_user("ani", None))
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn coordinator_assigns_peer_rank_but_not_above() -> TestResult {
        let ctx = TestContext::new().await;
        let coordinator = ctx.user_with_role("coord", names::COORDINATOR).await?;
        let target = ctx.user_with_role("budi", names::PICKER).await?;

        let updated = ctx
            .users
            .assign_role(&coordinator, target.uuid, names::COORDINATOR)
            .await?;

        assert!(
            updated.role_names().contains(&names::COORDINATOR),
            "coordinator role should be granted"
        );

        let result = ctx
            .users
            .assign_role(&coordinator, target.uuid, names::SUPERADMIN)
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::Unauthorized(_))),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn assigning_held_role_conflicts() -> TestResult {
        let ctx = TestContext::new().await;
        let target = ctx.user_with_role("budi", names::PICKER).await?;

        let result = ctx
            .users
            .assign_role(&ctx.superadmin, target.uuid, names::PICKER)
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::RoleAlreadyAssigned(_))),
            "expected RoleAlreadyAssigned, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn removing_unheld_role_is_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let target = ctx.user_with_role("budi", names::PICKER).await?;

        let result = ctx
            .users
            .remove_role(&ctx.superadmin, target.uuid, names::ADMIN)
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::RoleNotHeld(_))),
            "expected RoleNotHeld, got {result:?}"
        );

        let updated = ctx
            .users
            .remove_role(&ctx.superadmin, target.uuid, names::PICKER)
            .await?;

        assert!(updated.roles.is_empty(), "picker role should be removed");

        Ok(())
    }

    #[tokio::test]
    async fn self_deletion_is_forbidden_for_superadmin() {
        let ctx = TestContext::new().await;

        let result = ctx
            .users
            .delete_user(&ctx.superadmin, ctx.superadmin.uuid)
            .await;

        assert!(
            matches!(
                result,
                Err(UsersServiceError::Unauthorized(
                    pickflow::auth::AuthorizationError::SelfDeletion
                ))
            ),
            "expected SelfDeletion, got {result:?}"
        );
    }

    #[tokio::test]
    async fn equal_rank_cannot_delete_peer() -> TestResult {
        let ctx = TestContext::new().await;
        let coordinator = ctx.user_with_role("coord", names::COORDINATOR).await?;
        let peer = ctx.user_with_role("coord2", names::COORDINATOR).await?;

        let result = ctx.users.delete_user(&coordinator, peer.uuid).await;

        assert!(
            matches!(result, Err(UsersServiceError::Unauthorized(_))),
            "expected Unauthorized, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deleted_users_cannot_act() -> TestResult {
        let ctx = TestContext::new().await;
        let picker = ctx.user_with_role("budi", names::PICKER).await?;

        ctx.users.delete_user(&ctx.superadmin, picker.uuid).await?;

        let result = ctx.users.resolve_acting_user(picker.uuid).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn deactivated_users_cannot_act() -> TestResult {
        let ctx = TestContext::new().await;
        let picker = ctx.user_with_role("budi", names::PICKER).await?;

        let updated = ctx
            .users
            .set_active(&ctx.superadmin, picker.uuid, false)
            .await?;

        assert!(!updated.is_active, "user should be inactive");

        let result = ctx.users.resolve_acting_user(picker.uuid).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn password_reset_requires_higher_rank() -> TestResult {
        let ctx = TestContext::new().await;
        let picker = ctx.user_with_role("budi", names::PICKER).await?;
        let packer = ctx.user_with_role("pak", names::PACKING).await?;

        let result = ctx
            .users
            .reset_password(&picker, packer.uuid, "hash".to_string())
            .await;

        assert!(
            matches!(result, Err(UsersServiceError::Unauthorized(_))),
            "expected Unauthorized, got {result:?}"
        );

        ctx.users
            .reset_password(&ctx.superadmin, packer.uuid, "hash".to_string())
            .await?;

        Ok(())
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.users.get_user(UserUuid::new()).await;

        assert!(
            matches!(result, Err(UsersServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn user_administration_requires_coordinator_rank() -> TestResult {
        let ctx = TestContext::new().await;
        let picker = ctx.user_with_role("budi", names::PICKER).await?;
        let guest = ctx
            .users
            .create_user(&ctx.superadmin, new_user("tamu", None))
            .await?;

        let results = [
            ctx.users
                .create_user(&picker, new_user("ani", Some(names::PACKING)))
                .await
                .err(),
            ctx.users
                .create_user(&picker, new_user("eka", None))
                .await
                .err(),
            ctx.users
                .assign_role(&picker, guest.uuid, names::PICKER)
                .await
                .err(),
            ctx.users
                .remove_role(&picker, guest.uuid, names::GUEST)
                .await
                .err(),
            ctx.users
                .set_active(&picker, guest.uuid, false)
                .await
                .err(),
            ctx.users.delete_user(&picker, guest.uuid).await.err(),
        ];

        for result in results {
            assert!(
                matches!(
                    result,
                    Some(UsersServiceError::Unauthorized(
                        pickflow::auth::AuthorizationError::RankRequired {
                            role: names::COORDINATOR,
                            ..
                        }
                    ))
                ),
                "expected coordinator rank requirement, got {result:?}"
            );
        }

        let unchanged = ctx.users.get_user(guest.uuid).await?;

        assert!(unchanged.is_active, "guest stays active");
        assert_eq!(unchanged.role_names(), vec![names::GUEST]);

        Ok(())
    }

    #[tokio::test]
    async fn coordinator_administers_lower_ranks() -> TestResult {
        let ctx = TestContext::new().await;
        let coordinator = ctx.user_with_role("coord", names::COORDINATOR).await?;

        let created = ctx
            .users
            .create_user(&coordinator, new_user("budi", Some(names::PICKER)))
            .await?;

        ctx.users
            .assign_role(&coordinator, created.uuid, names::PACKING)
            .await?;
        ctx.users
            .remove_role(&coordinator, created.uuid, names::PICKER)
            .await?;

        let deactivated = ctx
            .users
            .set_active(&coordinator, created.uuid, false)
            .await?;

        assert!(!deactivated.is_active, "user should be inactive");
        assert_eq!(deactivated.role_names(), vec![names::PACKING]);

        ctx.users.delete_user(&coordinator, created.uuid).await?;

        Ok(())
    }

    #[tokio::test]
    async fn users_update_their_own_profile() -> TestResult {
        let ctx = TestContext::new().await;
        let picker = ctx.user_with_role("budi", names::PICKER).await?;

        let updated = ctx
            .users
            .update_profile(
                &picker,
                ProfileUpdate {
                    full_name: Some("Budi Santoso".to_string()),
                    email: Some("budi.santoso@pickflow.test".to_string()),
                },
            )
            .await?;

        assert_eq!(updated.full_name, "Budi Santoso");
        assert_eq!(updated.email, "budi.santoso@pickflow.test");
        assert_eq!(updated.role_names(), vec![names::PICKER]);

        let blank = ctx
            .users
            .update_profile(
                &picker,
                ProfileUpdate {
                    full_name: Some("  ".to_string()),
                    email: None,
                },
            )
            .await?;

        assert_eq!(blank.full_name, "Budi Santoso", "blank fields are ignored");
        assert_eq!(blank.email, "budi.santoso@pickflow.test");

        Ok(())
    }

    #[tokio::test]
    async fn profile_email_taken_by_another_user_conflicts() -> TestResult {
        let ctx = TestContext::new().await;
        let picker = ctx.user_with_role("budi", names::PICKER).await?;

        ctx.user_with_role("sari", names::PICKER).await?;

        let result = ctx
            .users
            .update_profile(
                &picker,
                ProfileUpdate {
                    full_name: None,
                    email: Some("sari@pickflow.test".to_string()),
                },
            )
            .await;

        assert_eq!(
            result.map_err(|error| error.kind()).err(),
            Some(FailureKind::Conflict)
        );
        assert_eq!(
            ctx.users.get_user(picker.uuid).await?.email,
            "budi@pickflow.test"
        );

        Ok(())
    }
}
