use anyhow::Result;
use clap::Args;
use toptraders_lib::{validation, TopTraders};

use crate::output::{print_addresses_markdown, print_addresses_table, print_json, OutputFormat};

#[derive(Args)]
pub struct ResolveArgs {
    /// Numeric id of the account whose follows are resolved
    pub fid: String,
}

pub async fn run(args: &ResolveArgs, service: &TopTraders, format: &OutputFormat) -> Result<()> {
    let fid = validation::validate_fid(&args.fid)?;
    let addresses = service.following_addresses(fid).await?;

    eprintln!("Resolved {} wallet(s) for fid {}", addresses.len(), fid);

    match format {
        OutputFormat::Json => print_json(&addresses),
        OutputFormat::Markdown => print_addresses_markdown(&addresses),
        OutputFormat::Text | OutputFormat::Table => print_addresses_table(&addresses),
    }

    Ok(())
}
