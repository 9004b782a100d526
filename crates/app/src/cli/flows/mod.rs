use clap::{Args, Subcommand};
use pickflow_app::config::AppConfig;

mod list;
mod show;

#[derive(Debug, Args)]
pub(crate) struct FlowsCommand {
    #[command(subcommand)]
    command: FlowsSubcommand,
}

#[derive(Debug, Subcommand)]
enum FlowsSubcommand {
    /// Reconstruct the flow of one tracking number
    Show(show::ShowArgs),
    /// List flows of one family, filtered and paged
    List(list::ListArgs),
}

pub(crate) async fn run(command: FlowsCommand, config: &AppConfig) -> Result<(), String> {
    match command.command {
        FlowsSubcommand::Show(args) => show::run(args, config).await,
        FlowsSubcommand::List(args) => list::run(args, config).await,
    }
}
