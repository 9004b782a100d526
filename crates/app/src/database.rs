//! Database connection management

use std::time::Duration;

use sqlx::{PgPool, Postgres, Transaction, migrate::MigrateError};
use tracing::{info, warn};

#[derive(Debug, Clone)]
pub struct Db {
    pool: PgPool,
}

impl Db {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Begin a transaction.
    ///
    /// # Errors
    ///
    /// Returns an error when a connection cannot be acquired.
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Connect to `PostgreSQL`.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    PgPool::connect(database_url).await
}

/// Connect to `PostgreSQL`, retrying a fixed number of times before giving up.
///
/// # Errors
///
/// Returns the last connection error once all attempts are exhausted.
pub async fn connect_with_retry(
    database_url: &str,
    attempts: u32,
    interval: Duration,
) -> Result<PgPool, sqlx::Error> {
    let attempts = attempts.max(1);
    let mut attempt = 1;

    loop {
        match connect(database_url).await {
            Ok(pool) => {
                info!(attempt, "connected to database");

                return Ok(pool);
            }
            Err(error) if attempt < attempts => {
                warn!(
                    attempt,
                    attempts,
                    retry_in_secs = interval.as_secs(),
                    error = %error,
                    "database connection failed, retrying"
                );

                tokio::time::sleep(interval).await;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}

/// Apply pending schema migrations.
///
/// # Errors
///
/// Returns an error when a migration fails to apply.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    sqlx::migrate!("../../migrations").run(pool).await
}
