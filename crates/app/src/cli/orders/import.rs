use std::{fs, path::PathBuf};

use clap::Args;
use pickflow::orders::NewOrder;
use pickflow_app::config::AppConfig;

#[derive(Debug, Args)]
pub(crate) struct ImportArgs {
    /// JSON file holding an array of orders
    #[arg(long)]
    file: PathBuf,
}

pub(crate) async fn run(args: ImportArgs, config: &AppConfig) -> Result<(), String> {
    let contents = fs::read_to_string(&args.file)
        .map_err(|error| format!("failed to read {}: {error}", args.file.display()))?;

    let orders: Vec<NewOrder> = serde_json::from_str(&contents)
        .map_err(|error| format!("failed to parse {}: {error}", args.file.display()))?;

    let ctx = crate::cli::context(config).await?;

    let summary = ctx
        .orders
        .create_orders(orders)
        .await
        .map_err(|error| format!("failed to import orders: {error}"))?;

    println!(
        "total: {}, created: {}, skipped: {}, failed: {}",
        summary.total,
        summary.created.len(),
        summary.skipped.len(),
        summary.failed.len()
    );

    crate::cli::print_json(&summary)
}
