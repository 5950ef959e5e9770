//! Handle to wallet resolution for followed accounts.

use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use tracing::{debug, warn};

use crate::address::{self, AddressSource, WalletAddress};
use crate::cache::TtlCache;
use crate::error::TopTradersError;
use crate::model::{AddressMap, SocialProfile};
use crate::provider::SocialGraphProvider;
use crate::validation::sanitize_handle;

/// Maximum verified-address lookups in flight for one batch.
const LOOKUP_CONCURRENCY: usize = 8;

/// Resolves profiles to wallet addresses.
///
/// Discovery order per profile is custody address, bio text, display name,
/// then the provider's verified-address list. Only the last step calls
/// upstream; its result (including "nothing verified") is cached per fid.
pub struct AddressResolver {
    provider: Arc<dyn SocialGraphProvider>,
    cache: TtlCache<Option<WalletAddress>>,
    ttl: Duration,
    timeout: Duration,
}

impl AddressResolver {
    pub fn new(
        provider: Arc<dyn SocialGraphProvider>,
        cache: TtlCache<Option<WalletAddress>>,
        ttl: Duration,
        timeout: Duration,
    ) -> Self {
        Self {
            provider,
            cache,
            ttl,
            timeout,
        }
    }

    /// Builds the handle to address map for `profiles`.
    ///
    /// Profiles without a usable handle are skipped, profiles with no
    /// discoverable address are omitted, and the first profile wins when two
    /// share a handle. Never fails: lookup errors count as "no address".
    pub async fn resolve(&self, profiles: &[SocialProfile]) -> AddressMap {
        let resolved: Vec<(String, Option<(WalletAddress, AddressSource)>)> =
            stream::iter(profiles.iter().filter_map(|p| {
                sanitize_handle(&p.handle).map(|handle| (handle, p))
            }))
            .map(|(handle, profile)| async move {
                let found = match address::local_address(profile) {
                    Some(hit) => Some(hit),
                    None => self
                        .verified_address(profile.fid)
                        .await
                        .map(|addr| (addr, AddressSource::Verified)),
                };
                (handle, found)
            })
            .buffered(LOOKUP_CONCURRENCY)
            .collect()
            .await;

        let mut map = AddressMap::new();
        for (handle, found) in resolved {
            let Some((addr, source)) = found else {
                debug!(handle = %handle, "no wallet address found");
                continue;
            };
            if map.contains_key(&handle) {
                continue;
            }
            debug!(handle = %handle, address = %addr, ?source, "resolved wallet");
            map.insert(handle, addr);
        }
        map
    }

    /// First verified address for `fid`, via the cache.
    async fn verified_address(&self, fid: u64) -> Option<WalletAddress> {
        let provider = Arc::clone(&self.provider);
        let timeout = self.timeout;
        let key = format!("verified:{}", fid);
        let lookup = self
            .cache
            .get_or_compute(&key, self.ttl, move || async move {
                let details = tokio::time::timeout(timeout, provider.user_details(fid))
                    .await
                    .map_err(|_| {
                        TopTradersError::UpstreamTimeout(format!(
                            "user lookup for fid {} exceeded {:?}",
                            fid, timeout
                        ))
                    })??;
                Ok(address::first_valid(&details.verified_addresses))
            })
            .await;

        match lookup {
            Ok(found) => found,
            Err(e) => {
                warn!(fid, error = %e, "verified address lookup failed, skipping");
                None
            }
        }
    }
}
