//! User records returned by the social-graph API.

use serde::{Deserialize, Serialize};

/// Numeric account identifier assigned by the network.
pub type Fid = u64;

/// A user record as embedded in following listings and bulk lookups.
///
/// Most fields are optional upstream; accounts mid-registration can lack a
/// username or profile block entirely.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct User {
    /// Numeric account id.
    pub fid: Fid,

    /// Username, without the leading `@`.
    #[serde(default)]
    pub username: Option<String>,

    /// Free-form display name.
    #[serde(default)]
    pub display_name: Option<String>,

    /// Address that owns the account on-chain.
    #[serde(default)]
    pub custody_address: Option<String>,

    #[serde(default)]
    pub profile: Option<Profile>,

    /// Wallets the user has proven ownership of.
    #[serde(default)]
    pub verified_addresses: Option<VerifiedAddresses>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Profile {
    #[serde(default)]
    pub bio: Option<Bio>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct Bio {
    #[serde(default)]
    pub text: Option<String>,
}

/// Verified wallet addresses, grouped by chain family.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct VerifiedAddresses {
    #[serde(default)]
    pub eth_addresses: Vec<String>,
    #[serde(default)]
    pub sol_addresses: Vec<String>,
}

impl User {
    /// Bio text, or an empty string when the profile block is absent.
    pub fn bio_text(&self) -> &str {
        self.profile
            .as_ref()
            .and_then(|p| p.bio.as_ref())
            .and_then(|b| b.text.as_deref())
            .unwrap_or("")
    }

    /// EVM addresses the user has verified, in provider order.
    pub fn eth_addresses(&self) -> &[String] {
        self.verified_addresses
            .as_ref()
            .map(|v| v.eth_addresses.as_slice())
            .unwrap_or(&[])
    }
}
