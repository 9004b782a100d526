//! Pickflow CLI

use std::process;

use clap::Parser;
use pickflow_app::{config, observability};

mod cli;

#[tokio::main]
pub async fn main() {
    config::load_dotenv();

    let cli = cli::Cli::parse();

    if let Err(error) = observability::init_subscriber(&cli.config.logging) {
        eprintln!("{error}");
        process::exit(1);
    }

    if let Err(error) = cli.run().await {
        eprintln!("{error}");
        process::exit(1);
    }
}
