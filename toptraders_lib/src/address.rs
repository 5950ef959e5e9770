//! Wallet address validation and extraction.
//!
//! Every place that turns free text into a [`WalletAddress`] goes through
//! this module, so the accepted pattern is defined exactly once.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::SocialProfile;

/// An address embedded in longer text. Word boundaries reject longer hex runs
/// such as transaction hashes.
static EMBEDDED_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b0x[0-9a-fA-F]{40}\b").expect("embedded address pattern"));

static EXACT_ADDRESS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^0x[0-9a-fA-F]{40}$").expect("exact address pattern"));

/// A validated, lowercase `0x`-prefixed 20-byte hex address.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Validates `input` (surrounding whitespace ignored) and normalizes it to lowercase.
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if EXACT_ADDRESS.is_match(trimmed) {
            Some(Self(trimmed.to_ascii_lowercase()))
        } else {
            None
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form used as a display handle, e.g. `0x1234...abcd`.
    pub fn short(&self) -> String {
        format!("{}...{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("invalid wallet address '{}'", value))
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

/// Returns the first address found anywhere in `text`.
pub fn extract_address(text: &str) -> Option<WalletAddress> {
    EMBEDDED_ADDRESS
        .find(text)
        .map(|m| WalletAddress(m.as_str().to_ascii_lowercase()))
}

/// Where a profile's address was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressSource {
    Custody,
    Bio,
    DisplayName,
    Verified,
}

/// Runs the offline discovery steps in priority order: custody address,
/// then bio text, then display name. The verified-address lookup needs the
/// provider and lives in the resolver.
pub fn local_address(profile: &SocialProfile) -> Option<(WalletAddress, AddressSource)> {
    if let Some(addr) = profile.custody_address.as_deref().and_then(WalletAddress::parse) {
        return Some((addr, AddressSource::Custody));
    }
    if let Some(addr) = extract_address(&profile.bio_text) {
        return Some((addr, AddressSource::Bio));
    }
    extract_address(&profile.display_name).map(|addr| (addr, AddressSource::DisplayName))
}

/// First valid entry of a verified-address list.
pub fn first_valid(addresses: &[String]) -> Option<WalletAddress> {
    addresses.iter().find_map(|a| WalletAddress::parse(a))
}
