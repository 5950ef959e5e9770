//! Library layer for Top Traders: social-graph address resolution, cached
//! performance lookups, ranking, and share-text formatting.
//!
//! Wraps the `graph_api` crate and an analytics HTTP client behind provider
//! traits, memoizes upstream calls in a single-flight TTL cache, and exposes
//! one composed entry point, [`TopTraders::resolve_and_rank`].

pub mod address;
pub mod analytics;
pub mod cache;
pub mod config;
pub mod error;
pub mod model;
pub mod performance;
pub mod provider;
pub mod ranking;
pub mod resolver;
pub mod service;
pub mod share;
pub mod validation;

pub use graph_api;

pub use address::{extract_address, WalletAddress};
pub use cache::TtlCache;
pub use config::Config;
pub use error::TopTradersError;
pub use model::{AddressMap, PerformanceRow, RankedTrader, Scope, SocialProfile, Timeframe};
pub use performance::PerformanceFetcher;
pub use provider::{AnalyticsProvider, GraphProvider, SocialGraphProvider, UserDetails};
pub use ranking::{rank, DEFAULT_LIMIT};
pub use resolver::AddressResolver;
pub use service::TopTraders;
pub use share::{format_share_text, ShareFormatter};
