//! Application configuration
//!
//! Every setting can be supplied as a flag or through the environment, and a
//! `.env` file in the working directory is honoured.

use clap::Args;

pub mod db;
pub mod logging;
pub mod roles;

pub use db::DatabaseConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use roles::RolesConfig;

/// Settings shared by every `pickflow` command.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Application database settings.
    #[command(flatten)]
    pub database: DatabaseConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Role hierarchy settings.
    #[command(flatten)]
    pub roles: RolesConfig,
}

/// Load a `.env` file if present. A missing file is not an error.
pub fn load_dotenv() {
    _ = dotenvy::dotenv();
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use testresult::TestResult;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        config: AppConfig,
    }

    #[test]
    fn defaults_apply_when_only_database_url_is_given() -> TestResult {
        let harness = Harness::try_parse_from(["pickflow", "--database-url", "postgres://x"])?;

        assert_eq!(harness.config.database.database_url, "postgres://x");
        assert_eq!(harness.config.database.db_connect_attempts, 10);
        assert_eq!(harness.config.database.db_connect_interval_secs, 10);
        assert!(matches!(harness.config.logging.log_format, LogFormat::Compact));
        assert!(harness.config.roles.role_hierarchy_file.is_none());

        Ok(())
    }

    #[test]
    fn json_log_format_is_accepted() -> TestResult {
        let harness = Harness::try_parse_from([
            "pickflow",
            "--database-url",
            "postgres://x",
            "--log-format",
            "json",
        ])?;

        assert!(matches!(harness.config.logging.log_format, LogFormat::Json));

        Ok(())
    }
}
