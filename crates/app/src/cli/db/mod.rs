use clap::{Args, Subcommand};
use pickflow_app::config::AppConfig;

mod migrate;
mod seed;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate,
    /// Insert missing roles and optionally create the first superadmin
    Seed(seed::SeedArgs),
}

pub(crate) async fn run(command: DbCommand, config: &AppConfig) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate => migrate::run(config).await,
        DbSubcommand::Seed(args) => seed::run(args, config).await,
    }
}
