use clap::Args;
use jiff::civil::Date;
use pickflow::flows::{DEFAULT_PAGE_SIZE, DateRange, FlowFilter, FlowKind, Page};
use pickflow_app::config::AppConfig;

#[derive(Debug, Args)]
pub(crate) struct ListArgs {
    /// Flow family (ribbon, online)
    #[arg(long)]
    kind: FlowKind,

    /// First day included (YYYY-MM-DD, UTC)
    #[arg(long)]
    start_date: Option<Date>,

    /// Last day included (YYYY-MM-DD, UTC)
    #[arg(long)]
    end_date: Option<Date>,

    /// Case-insensitive tracking substring
    #[arg(long)]
    search: Option<String>,

    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    page: u32,

    /// Flows per page (1-100)
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
    page_size: u32,
}

pub(crate) async fn run(args: ListArgs, config: &AppConfig) -> Result<(), String> {
    let page = Page::new(args.page, args.page_size).map_err(|error| error.to_string())?;

    let filter = FlowFilter {
        dates: DateRange {
            start: args.start_date,
            end: args.end_date,
        },
        search: args.search,
    };

    let ctx = crate::cli::context(config).await?;

    let flows = ctx
        .flows
        .list_flows(args.kind, filter, page)
        .await
        .map_err(|error| format!("failed to list flows: {error}"))?;

    crate::cli::print_json(&flows)
}
