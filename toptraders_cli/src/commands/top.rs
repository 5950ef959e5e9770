use anyhow::Result;
use clap::Args;
use toptraders_lib::{validation, TopTraders, DEFAULT_LIMIT};

use crate::output::{print_json, print_traders_markdown, print_traders_table, OutputFormat};

#[derive(Args)]
pub struct TopArgs {
    /// Numeric id of the account whose follows are ranked
    pub fid: String,

    /// Timeframe: 24h or 7d
    #[arg(long, default_value = "24h")]
    pub timeframe: String,

    /// Number of traders to show
    #[arg(long, default_value_t = DEFAULT_LIMIT, allow_negative_numbers = true)]
    pub limit: i64,

    /// Scope: user (followed wallets only) or global (provider leaderboard)
    #[arg(long, default_value = "user")]
    pub scope: String,

    /// Override the scope wording in share text
    #[arg(long)]
    pub label: Option<String>,
}

pub async fn run(args: &TopArgs, service: &TopTraders, format: &OutputFormat) -> Result<()> {
    let fid = validation::validate_fid(&args.fid)?;
    let timeframe = validation::parse_timeframe(&args.timeframe)?;
    let scope = validation::parse_scope(&args.scope)?;

    let traders = service
        .resolve_and_rank(fid, timeframe, args.limit, scope)
        .await?;

    if traders.is_empty() {
        eprintln!("No trading data for fid {} over {}", fid, timeframe);
    }

    match format {
        OutputFormat::Text => {
            let label = args.label.as_deref().unwrap_or(scope.label());
            println!("{}", service.format_share_text(&traders, timeframe, label));
        }
        OutputFormat::Table => print_traders_table(&traders),
        OutputFormat::Markdown => print_traders_markdown(&traders),
        OutputFormat::Json => print_json(&traders),
    }

    Ok(())
}
