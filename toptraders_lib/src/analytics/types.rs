//! Request and response types for the analytics API.

use serde::{Deserialize, Deserializer, Serialize};

/// Body of a performance query.
#[derive(Debug, Serialize)]
pub struct PerformanceQuery<'a> {
    pub addresses: &'a [String],
    pub timeframe: &'a str,
}

/// Envelope returned by the performance endpoint.
#[derive(Debug, Deserialize)]
pub struct PerformanceResponse {
    #[serde(default)]
    pub data: Vec<WalletPerformance>,
}

/// One wallet's metrics, as sent by the provider.
///
/// Every field is optional: wallets without activity in the window come
/// back with `null` metrics, and some deployments send numbers as strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WalletPerformance {
    #[serde(default, alias = "wallet", alias = "wallet_address")]
    pub address: Option<String>,
    #[serde(default, alias = "pnl", deserialize_with = "lenient_f64")]
    pub earnings: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub volume: Option<f64>,
    #[serde(default, alias = "topToken")]
    pub top_token: Option<String>,
}

/// Accepts a JSON number, a numeric string, or null. Anything else,
/// including non-finite values, becomes `None`.
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Value>::deserialize(deserializer)?;
    let parsed = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(parsed.filter(|v| v.is_finite()))
}
