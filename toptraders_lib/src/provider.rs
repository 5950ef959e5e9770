//! Upstream provider seams.
//!
//! The resolver and fetcher talk to these traits rather than to concrete
//! HTTP clients, so tests can substitute counting fakes.

use async_trait::async_trait;
use graph_api::types::User;

use crate::address::WalletAddress;
use crate::analytics::{AnalyticsClient, WalletPerformance};
use crate::error::TopTradersError;
use crate::model::{SocialProfile, Timeframe};

/// Page size used when walking following listings.
const FOLLOWING_PAGE_SIZE: u32 = 100;

/// A user record together with the wallets they have verified.
#[derive(Debug, Clone, PartialEq)]
pub struct UserDetails {
    pub profile: SocialProfile,
    pub verified_addresses: Vec<String>,
}

/// Social-graph operations the core depends on.
#[async_trait]
pub trait SocialGraphProvider: Send + Sync {
    /// Accounts followed by `fid`.
    async fn following(&self, fid: u64) -> Result<Vec<SocialProfile>, TopTradersError>;

    /// Full record for `fid`, including verified addresses.
    async fn user_details(&self, fid: u64) -> Result<UserDetails, TopTradersError>;
}

/// Analytics operations the core depends on.
#[async_trait]
pub trait AnalyticsProvider: Send + Sync {
    /// Raw performance rows for `addresses`; an empty slice asks for the
    /// global leaderboard.
    async fn query(
        &self,
        addresses: &[WalletAddress],
        timeframe: Timeframe,
    ) -> Result<Vec<WalletPerformance>, TopTradersError>;
}

impl From<User> for SocialProfile {
    fn from(user: User) -> Self {
        let bio_text = user.bio_text().to_string();
        SocialProfile {
            handle: user.username.unwrap_or_default(),
            fid: user.fid,
            bio_text,
            display_name: user.display_name.unwrap_or_default(),
            custody_address: user.custody_address,
        }
    }
}

impl From<User> for UserDetails {
    fn from(user: User) -> Self {
        let verified_addresses = user.eth_addresses().to_vec();
        UserDetails {
            profile: user.into(),
            verified_addresses,
        }
    }
}

/// [`SocialGraphProvider`] backed by the `graph_api` HTTP client.
pub struct GraphProvider {
    client: graph_api::Client,
    max_pages: usize,
}

impl GraphProvider {
    pub fn new(client: graph_api::Client, max_pages: usize) -> Self {
        Self { client, max_pages }
    }
}

#[async_trait]
impl SocialGraphProvider for GraphProvider {
    async fn following(&self, fid: u64) -> Result<Vec<SocialProfile>, TopTradersError> {
        let users = self
            .client
            .get_all_following(fid, FOLLOWING_PAGE_SIZE, self.max_pages)
            .await?;
        Ok(users.into_iter().map(SocialProfile::from).collect())
    }

    async fn user_details(&self, fid: u64) -> Result<UserDetails, TopTradersError> {
        Ok(self.client.get_user(fid).await?.into())
    }
}

#[async_trait]
impl AnalyticsProvider for AnalyticsClient {
    async fn query(
        &self,
        addresses: &[WalletAddress],
        timeframe: Timeframe,
    ) -> Result<Vec<WalletPerformance>, TopTradersError> {
        let addresses: Vec<String> = addresses.iter().map(|a| a.as_str().to_string()).collect();
        Ok(self
            .wallet_performance(&addresses, timeframe.as_str())
            .await?)
    }
}
