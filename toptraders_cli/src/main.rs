mod commands;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use toptraders_lib::{Config, TopTraders};

use crate::output::OutputFormat;

#[derive(Parser)]
#[command(name = "toptraders")]
#[command(about = "Rank the best on-chain traders among the accounts you follow")]
struct Cli {
    /// Output format: text, table, json, markdown
    #[arg(long, default_value = "text", global = true)]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank followed accounts by trading earnings
    Top(commands::top::TopArgs),
    /// Show the wallet resolved for each followed account
    Resolve(commands::resolve::ResolveArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("toptraders=info".parse()?),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = OutputFormat::parse(&cli.output);

    let config = Config::from_env().context("loading configuration")?;
    let service = TopTraders::from_config(&config)?;

    match &cli.command {
        Commands::Top(args) => commands::top::run(args, &service, &format).await?,
        Commands::Resolve(args) => commands::resolve::run(args, &service, &format).await?,
    }

    Ok(())
}
