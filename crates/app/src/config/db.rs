//! Database Config

use std::time::Duration;

use clap::Args;

/// Database settings.
#[derive(Debug, Args)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: String,

    /// Connection attempts before giving up at startup
    #[arg(long, env = "DB_CONNECT_ATTEMPTS", default_value_t = 10)]
    pub db_connect_attempts: u32,

    /// Seconds to wait between connection attempts
    #[arg(long, env = "DB_CONNECT_INTERVAL_SECS", default_value_t = 10)]
    pub db_connect_interval_secs: u64,
}

impl DatabaseConfig {
    /// Delay between connection attempts.
    #[must_use]
    pub fn connect_interval(&self) -> Duration {
        Duration::from_secs(self.db_connect_interval_secs)
    }
}
