//! Error types for analytics API operations.

use thiserror::Error;

/// Errors from analytics API operations.
#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Rate limited by analytics API (HTTP 429)")]
    RateLimited,
    #[error("Invalid API key (HTTP {0})")]
    InvalidApiKey(u16),
    #[error("Request failed with status {status}: {body}")]
    HttpStatus { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    ParseFailed(String),
    #[error("Request timed out")]
    Timeout,
    #[error("Network error")]
    Network(#[from] reqwest::Error),
}
