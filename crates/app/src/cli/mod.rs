use clap::{Parser, Subcommand};
use pickflow_app::{config::AppConfig, context::AppContext};

mod db;
mod flows;
mod orders;

#[derive(Debug, Parser)]
#[command(name = "pickflow", about = "Pickflow warehouse CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: AppConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Db(db::DbCommand),
    Orders(orders::OrdersCommand),
    Flows(flows::FlowsCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Db(command) => db::run(command, &self.config).await,
            Commands::Orders(command) => orders::run(command, &self.config).await,
            Commands::Flows(command) => flows::run(command, &self.config).await,
        }
    }
}

async fn context(config: &AppConfig) -> Result<AppContext, String> {
    AppContext::from_config(config)
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|error| format!("failed to render output: {error}"))?;

    println!("{json}");

    Ok(())
}
