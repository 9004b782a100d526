use clap::Args;
use pickflow::flows::FlowKind;
use pickflow_app::config::AppConfig;

#[derive(Debug, Args)]
pub(crate) struct ShowArgs {
    /// Flow family (ribbon, online)
    #[arg(long)]
    kind: FlowKind,

    /// Tracking number
    tracking: String,
}

pub(crate) async fn run(args: ShowArgs, config: &AppConfig) -> Result<(), String> {
    let ctx = crate::cli::context(config).await?;

    let flow = ctx
        .flows
        .reconstruct_flow(args.kind, &args.tracking)
        .await
        .map_err(|error| format!("failed to reconstruct flow: {error}"))?;

    crate::cli::print_json(&flow)
}
