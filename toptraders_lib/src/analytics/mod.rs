//! Analytics API client for wallet trading performance.
//!
//! One batched `POST` returns earnings, volume and top token for every
//! requested wallet over a timeframe. An empty address list asks for the
//! provider's global leaderboard.

pub mod client;
pub mod error;
pub mod types;

pub use client::AnalyticsClient;
pub use error::AnalyticsError;
pub use types::WalletPerformance;
