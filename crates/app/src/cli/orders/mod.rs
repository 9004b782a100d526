use clap::{Args, Subcommand};
use pickflow_app::config::AppConfig;

mod import;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// Store a batch of orders read from a JSON array
    Import(import::ImportArgs),
}

pub(crate) async fn run(command: OrdersCommand, config: &AppConfig) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::Import(args) => import::run(args, config).await,
    }
}
