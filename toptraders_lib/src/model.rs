//! Domain types shared by the resolver, fetcher, ranker and formatter.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::address::WalletAddress;
use crate::error::TopTradersError;
use crate::validation;

/// A followed account as reported by the social-graph provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialProfile {
    /// Username without the leading `@`. Empty when the account has none.
    pub handle: String,
    /// Numeric account id.
    pub fid: u64,
    pub bio_text: String,
    pub display_name: String,
    /// Raw custody address, unvalidated.
    pub custody_address: Option<String>,
}

/// Handle to wallet address. Ordered so reverse lookups are deterministic.
pub type AddressMap = BTreeMap<String, WalletAddress>;

/// Trading metrics for one wallet over a timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRow {
    pub wallet_address: WalletAddress,
    /// Realized plus unrealized profit in USD.
    pub earnings: f64,
    /// Traded notional in USD.
    pub volume: f64,
    pub top_token: Option<String>,
}

/// One entry of a ranked leaderboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedTrader {
    pub handle: String,
    pub wallet_address: WalletAddress,
    pub earnings: f64,
    pub volume: f64,
    pub top_token: Option<String>,
    /// 1-based position.
    pub rank: u32,
}

/// Analytics window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
}

impl Timeframe {
    /// Wire value sent to the analytics provider.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "24h",
            Self::Week => "7d",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = TopTradersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validation::parse_timeframe(s)
    }
}

/// Which wallets a ranking covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Only wallets of accounts the user follows.
    User,
    /// The provider's global leaderboard, labelled with followed handles where known.
    Global,
}

impl Scope {
    /// Whether rows without a matching handle stay in the ranking.
    pub fn include_unmatched(&self) -> bool {
        matches!(self, Self::Global)
    }

    /// Default label used in share text.
    pub fn label(&self) -> &'static str {
        match self {
            Self::User => "people I follow",
            Self::Global => "all tracked wallets",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Global => f.write_str("global"),
        }
    }
}

impl FromStr for Scope {
    type Err = TopTradersError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        validation::parse_scope(s)
    }
}
