//! App Context

use std::sync::Arc;

use pickflow::roles::{RoleHierarchy, RoleHierarchyError};
use sqlx::PgPool;
use thiserror::Error;

use crate::{
    config::AppConfig,
    database::{self, Db},
    domain::{
        flows::{FlowsService, PgFlowsService},
        orders::{OrdersService, PgOrdersService},
        users::{PgUsersService, UsersService},
    },
};

/// Failures while building the [`AppContext`].
#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to connect to database")]
    Database(#[source] sqlx::Error),

    #[error("failed to load role hierarchy")]
    Hierarchy(#[source] RoleHierarchyError),
}

/// Services shared by every command, over one pool and one role hierarchy.
#[derive(Clone)]
pub struct AppContext {
    pub orders: Arc<dyn OrdersService>,
    pub users: Arc<dyn UsersService>,
    pub flows: Arc<dyn FlowsService>,
    pub hierarchy: Arc<RoleHierarchy>,
}

impl AppContext {
    /// Build application context from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error when the role hierarchy cannot be loaded or every
    /// database connection attempt fails.
    pub async fn from_config(config: &AppConfig) -> Result<Self, AppInitError> {
        let hierarchy = config.roles.load().map_err(AppInitError::Hierarchy)?;

        let pool = database::connect_with_retry(
            &config.database.database_url,
            config.database.db_connect_attempts,
            config.database.connect_interval(),
        )
        .await
        .map_err(AppInitError::Database)?;

        Ok(Self::from_pool(pool, hierarchy))
    }

    /// Build application context over an existing pool.
    #[must_use]
    pub fn from_pool(pool: PgPool, hierarchy: RoleHierarchy) -> Self {
        let db = Db::new(pool);
        let hierarchy = Arc::new(hierarchy);

        Self {
            orders: Arc::new(PgOrdersService::new(db.clone(), Arc::clone(&hierarchy))),
            users: Arc::new(PgUsersService::new(db.clone(), Arc::clone(&hierarchy))),
            flows: Arc::new(PgFlowsService::new(db)),
            hierarchy,
        }
    }
}
