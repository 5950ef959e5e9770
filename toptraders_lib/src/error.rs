//! Error types for the library layer.

use crate::analytics::AnalyticsError;

/// Errors produced by the library layer.
///
/// Per-item problems (an unresolvable profile, a malformed performance row)
/// never surface here; they are dropped or defaulted where they occur. Only
/// input validation and whole-batch upstream failures propagate. The type is
/// `Clone` so a single upstream failure can be handed to every caller waiting
/// on the same cache key.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TopTradersError {
    /// User-provided input failed validation.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// A ranking limit that is zero or negative.
    #[error("Invalid limit {0}: must be a positive integer")]
    InvalidLimit(i64),
    /// An upstream provider call failed or returned a non-success status.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),
    /// An upstream provider call exceeded its deadline.
    #[error("Upstream timed out: {0}")]
    UpstreamTimeout(String),
    /// Required configuration is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TopTradersError {
    /// True for failures the caller may answer with cached or degraded data.
    pub fn is_upstream(&self) -> bool {
        matches!(
            self,
            Self::UpstreamUnavailable(_) | Self::UpstreamTimeout(_)
        )
    }
}

impl From<graph_api::Error> for TopTradersError {
    fn from(e: graph_api::Error) -> Self {
        match e {
            graph_api::Error::Timeout => Self::UpstreamTimeout("social graph request".to_string()),
            other => Self::UpstreamUnavailable(format!("social graph: {}", other)),
        }
    }
}

impl From<AnalyticsError> for TopTradersError {
    fn from(e: AnalyticsError) -> Self {
        match e {
            AnalyticsError::Timeout => Self::UpstreamTimeout("analytics request".to_string()),
            AnalyticsError::Network(ref inner) if inner.is_timeout() => {
                Self::UpstreamTimeout("analytics request".to_string())
            }
            other => Self::UpstreamUnavailable(format!("analytics: {}", other)),
        }
    }
}
