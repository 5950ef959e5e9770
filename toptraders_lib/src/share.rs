//! Plain-text share output for a ranked list.

use crate::model::{RankedTrader, Timeframe};

/// Link appended to every share text unless overridden.
pub const DEFAULT_SHARE_URL: &str = "https://toptraders.app";

const NO_DATA_LINE: &str = "No trading data available for this period.";

/// Renders ranked traders as share text. Output depends only on the inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareFormatter {
    cta_url: String,
}

impl Default for ShareFormatter {
    fn default() -> Self {
        Self::with_url(DEFAULT_SHARE_URL)
    }
}

impl ShareFormatter {
    pub fn with_url(url: &str) -> Self {
        Self {
            cta_url: url.to_string(),
        }
    }

    pub fn format(&self, traders: &[RankedTrader], timeframe: Timeframe, scope_label: &str) -> String {
        let mut lines = vec![format!("Top traders among {} ({})", scope_label, timeframe)];

        if traders.is_empty() {
            lines.push(NO_DATA_LINE.to_string());
            return lines.join("\n");
        }

        for trader in traders {
            lines.push(format!(
                "{}. @{}: {} / {} volume ({})",
                trader.rank,
                trader.handle,
                format_earnings(trader.earnings),
                format_compact_volume(trader.volume),
                trader.top_token.as_deref().unwrap_or("N/A"),
            ));
        }
        lines.push(format!("Find your top traders: {}", self.cta_url));
        lines.join("\n")
    }
}

/// [`ShareFormatter::format`] with the default link.
pub fn format_share_text(traders: &[RankedTrader], timeframe: Timeframe, scope_label: &str) -> String {
    ShareFormatter::default().format(traders, timeframe, scope_label)
}

/// Whole dollars with thousands separators: `$12,345`, `-$1,200`.
pub fn format_earnings(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{:.0}", rounded.abs());

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{}${}", sign, grouped)
}

/// Compact dollars: `$1.5M`, `$2.5K`, `$950`.
pub fn format_compact_volume(value: f64) -> String {
    if value >= 1_000_000.0 {
        format!("${:.1}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.1}K", value / 1_000.0)
    } else {
        format!("${:.0}", value)
    }
}
