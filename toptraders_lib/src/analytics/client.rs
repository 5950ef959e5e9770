//! Analytics API client implementation.

use std::time::Duration;

use super::error::AnalyticsError;
use super::types::{PerformanceQuery, PerformanceResponse, WalletPerformance};

/// Request timeout for analytics API calls.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Analytics REST API client for wallet performance.
pub struct AnalyticsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl AnalyticsClient {
    /// Create a new AnalyticsClient against `base_url`.
    pub fn new(base_url: &str, api_key: String) -> Result<Self, AnalyticsError> {
        Self::with_timeout(base_url, api_key, REQUEST_TIMEOUT)
    }

    /// Create a new AnalyticsClient with an explicit per-request timeout.
    pub fn with_timeout(
        base_url: &str,
        api_key: String,
        timeout: Duration,
    ) -> Result<Self, AnalyticsError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch performance for `addresses` over `timeframe` (`"24h"` or `"7d"`).
    ///
    /// Returns rows in provider order. An empty `addresses` slice requests
    /// the provider's global leaderboard.
    pub async fn wallet_performance(
        &self,
        addresses: &[String],
        timeframe: &str,
    ) -> Result<Vec<WalletPerformance>, AnalyticsError> {
        let url = format!("{}/wallets/performance", self.base_url);

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .json(&PerformanceQuery {
                addresses,
                timeframe,
            })
            .send()
            .await
            .map_err(timeout_or_network)?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(AnalyticsError::RateLimited);
        }
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(AnalyticsError::InvalidApiKey(status.as_u16()));
        }
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());
            let body_snippet = if body.len() > 200 {
                format!("{}...", snippet(&body, 200))
            } else {
                body
            };
            tracing::error!("analytics query failed with status {}: {}", status, body_snippet);
            return Err(AnalyticsError::HttpStatus {
                status: status.as_u16(),
                body: body_snippet,
            });
        }

        let body = response.text().await.map_err(timeout_or_network)?;
        let parsed: PerformanceResponse = serde_json::from_str(&body).map_err(|e| {
            AnalyticsError::ParseFailed(format!(
                "Failed to deserialize response: {} | body: {}",
                e,
                snippet(&body, 500)
            ))
        })?;
        Ok(parsed.data)
    }
}

/// Longest prefix of `body` that fits in `max` bytes without splitting a character.
fn snippet(body: &str, max: usize) -> &str {
    if body.len() <= max {
        return body;
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}

fn timeout_or_network(e: reqwest::Error) -> AnalyticsError {
    if e.is_timeout() {
        AnalyticsError::Timeout
    } else {
        AnalyticsError::Network(e)
    }
}
