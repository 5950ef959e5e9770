use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};
use toptraders_lib::share::{format_compact_volume, format_earnings};
use toptraders_lib::{AddressMap, RankedTrader};

#[derive(Clone, Debug, PartialEq)]
pub enum OutputFormat {
    /// Share text, ready to post.
    Text,
    Table,
    Json,
    Markdown,
}

impl OutputFormat {
    /// Unknown values fall back to share text.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "table" => Self::Table,
            "json" => Self::Json,
            "markdown" | "md" => Self::Markdown,
            _ => Self::Text,
        }
    }
}

#[derive(Tabled)]
struct TraderRow {
    #[tabled(rename = "#")]
    rank: u32,
    #[tabled(rename = "Handle")]
    handle: String,
    #[tabled(rename = "Wallet")]
    wallet: String,
    #[tabled(rename = "Earnings")]
    earnings: String,
    #[tabled(rename = "Volume")]
    volume: String,
    #[tabled(rename = "Top Token")]
    top_token: String,
}

#[derive(Tabled)]
struct AddressRow {
    #[tabled(rename = "Handle")]
    handle: String,
    #[tabled(rename = "Wallet")]
    wallet: String,
}

fn build_trader_rows(traders: &[RankedTrader]) -> Vec<TraderRow> {
    traders
        .iter()
        .map(|t| TraderRow {
            rank: t.rank,
            handle: format!("@{}", t.handle),
            wallet: t.wallet_address.short(),
            earnings: format_earnings(t.earnings),
            volume: format_compact_volume(t.volume),
            top_token: t.top_token.clone().unwrap_or_else(|| "N/A".to_string()),
        })
        .collect()
}

fn build_address_rows(addresses: &AddressMap) -> Vec<AddressRow> {
    addresses
        .iter()
        .map(|(handle, wallet)| AddressRow {
            handle: format!("@{}", handle),
            wallet: wallet.to_string(),
        })
        .collect()
}

// -- Table output --

pub fn print_traders_table(traders: &[RankedTrader]) {
    println!("{}", Table::new(build_trader_rows(traders)));
}

pub fn print_addresses_table(addresses: &AddressMap) {
    println!("{}", Table::new(build_address_rows(addresses)));
}

// -- Markdown output --

pub fn print_traders_markdown(traders: &[RankedTrader]) {
    let mut table = Table::new(build_trader_rows(traders));
    table.with(Style::markdown());
    println!("{}", table);
}

pub fn print_addresses_markdown(addresses: &AddressMap) {
    let mut table = Table::new(build_address_rows(addresses));
    table.with(Style::markdown());
    println!("{}", table);
}

// -- JSON output --

pub fn print_json<T: Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}
