//! Runtime configuration read from `TOPTRADERS_*` environment variables.

use std::time::Duration;

use crate::error::TopTradersError;
use crate::share::DEFAULT_SHARE_URL;

pub const DEFAULT_GRAPH_BASE_URL: &str = "https://api.neynar.com/v2/farcaster";

const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 8;
const DEFAULT_PERFORMANCE_TTL_SECS: u64 = 300;
const DEFAULT_ADDRESS_TTL_SECS: u64 = 900;
const DEFAULT_FOLLOWING_MAX_PAGES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub graph_api_key: String,
    pub graph_base_url: String,
    pub analytics_api_key: String,
    pub analytics_base_url: String,
    /// Hard cap on every upstream call, including ones that outlive their caller.
    pub upstream_timeout: Duration,
    pub performance_ttl: Duration,
    pub address_ttl: Duration,
    pub following_max_pages: usize,
    pub share_url: String,
}

impl Default for Config {
    /// Defaults with empty credentials; useful for tests and fakes.
    fn default() -> Self {
        Self {
            graph_api_key: String::new(),
            graph_base_url: DEFAULT_GRAPH_BASE_URL.to_string(),
            analytics_api_key: String::new(),
            analytics_base_url: String::new(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
            performance_ttl: Duration::from_secs(DEFAULT_PERFORMANCE_TTL_SECS),
            address_ttl: Duration::from_secs(DEFAULT_ADDRESS_TTL_SECS),
            following_max_pages: DEFAULT_FOLLOWING_MAX_PAGES,
            share_url: DEFAULT_SHARE_URL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, TopTradersError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, TopTradersError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let require = |key: &str| {
            get(key).ok_or_else(|| TopTradersError::Config(format!("{} is not set", key)))
        };
        // Zero counts as unset.
        let secs = |key: &str, default: u64| {
            Duration::from_secs(
                get(key)
                    .and_then(|v| v.parse::<u64>().ok())
                    .filter(|n| *n > 0)
                    .unwrap_or(default),
            )
        };

        Ok(Self {
            graph_api_key: require("TOPTRADERS_GRAPH_API_KEY")?,
            graph_base_url: get("TOPTRADERS_GRAPH_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GRAPH_BASE_URL.to_string()),
            analytics_api_key: require("TOPTRADERS_ANALYTICS_API_KEY")?,
            analytics_base_url: require("TOPTRADERS_ANALYTICS_BASE_URL")?,
            upstream_timeout: secs("TOPTRADERS_UPSTREAM_TIMEOUT_SECS", DEFAULT_UPSTREAM_TIMEOUT_SECS),
            performance_ttl: secs("TOPTRADERS_PERFORMANCE_TTL_SECS", DEFAULT_PERFORMANCE_TTL_SECS),
            address_ttl: secs("TOPTRADERS_ADDRESS_TTL_SECS", DEFAULT_ADDRESS_TTL_SECS),
            following_max_pages: get("TOPTRADERS_FOLLOWING_MAX_PAGES")
                .and_then(|v| v.parse::<usize>().ok())
                .filter(|n| *n > 0)
                .unwrap_or(DEFAULT_FOLLOWING_MAX_PAGES),
            share_url: get("TOPTRADERS_SHARE_URL").unwrap_or_else(|| DEFAULT_SHARE_URL.to_string()),
        })
    }
}
