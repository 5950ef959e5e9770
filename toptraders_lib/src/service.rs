//! Composed entry point: following list to ranked traders.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::address::WalletAddress;
use crate::analytics::AnalyticsClient;
use crate::cache::TtlCache;
use crate::config::Config;
use crate::error::TopTradersError;
use crate::model::{AddressMap, PerformanceRow, RankedTrader, Scope, Timeframe};
use crate::performance::PerformanceFetcher;
use crate::provider::{AnalyticsProvider, GraphProvider, SocialGraphProvider};
use crate::ranking::rank;
use crate::resolver::AddressResolver;
use crate::share::ShareFormatter;
use crate::validation::validate_limit;

/// Resolves, fetches and ranks in one call. Caches are owned per instance;
/// share one `TopTraders` across requests to share them.
pub struct TopTraders {
    graph: Arc<dyn SocialGraphProvider>,
    resolver: AddressResolver,
    fetcher: PerformanceFetcher,
    address_cache: TtlCache<Option<WalletAddress>>,
    performance_cache: TtlCache<Vec<PerformanceRow>>,
    share: ShareFormatter,
    timeout: Duration,
}

impl TopTraders {
    pub fn new(
        graph: Arc<dyn SocialGraphProvider>,
        analytics: Arc<dyn AnalyticsProvider>,
        config: &Config,
    ) -> Self {
        let address_cache = TtlCache::new();
        let performance_cache = TtlCache::new();
        let resolver = AddressResolver::new(
            Arc::clone(&graph),
            address_cache.clone(),
            config.address_ttl,
            config.upstream_timeout,
        );
        let fetcher = PerformanceFetcher::new(
            analytics,
            performance_cache.clone(),
            config.performance_ttl,
            config.upstream_timeout,
        );
        Self {
            graph,
            resolver,
            fetcher,
            address_cache,
            performance_cache,
            share: ShareFormatter::with_url(&config.share_url),
            timeout: config.upstream_timeout,
        }
    }

    /// Wires the HTTP-backed providers described by `config`.
    pub fn from_config(config: &Config) -> Result<Self, TopTradersError> {
        let graph_client = graph_api::Client::with_config(
            &config.graph_base_url,
            config.graph_api_key.clone(),
            config.upstream_timeout,
        )?;
        let analytics = AnalyticsClient::with_timeout(
            &config.analytics_base_url,
            config.analytics_api_key.clone(),
            config.upstream_timeout,
        )?;
        Ok(Self::new(
            Arc::new(GraphProvider::new(graph_client, config.following_max_pages)),
            Arc::new(analytics),
            config,
        ))
    }

    /// Handle to wallet map for everyone `fid` follows.
    pub async fn following_addresses(&self, fid: u64) -> Result<AddressMap, TopTradersError> {
        if fid == 0 {
            return Err(TopTradersError::InvalidInput(
                "fid must be a positive integer".to_string(),
            ));
        }
        let following = tokio::time::timeout(self.timeout, self.graph.following(fid))
            .await
            .map_err(|_| {
                TopTradersError::UpstreamTimeout(format!(
                    "following list for fid {} exceeded {:?}",
                    fid, self.timeout
                ))
            })??;
        debug!(fid, following = following.len(), "fetched following list");
        Ok(self.resolver.resolve(&following).await)
    }

    /// Top `limit` traders for `fid` over `timeframe`.
    ///
    /// An empty result means there was nothing to rank; it is not an error.
    pub async fn resolve_and_rank(
        &self,
        fid: u64,
        timeframe: Timeframe,
        limit: i64,
        scope: Scope,
    ) -> Result<Vec<RankedTrader>, TopTradersError> {
        validate_limit(limit)?;
        // Global rankings only use the following list for labels.
        let address_map = match self.following_addresses(fid).await {
            Ok(map) => map,
            Err(e) if scope == Scope::Global && e.is_upstream() => {
                warn!(fid, error = %e, "following list unavailable, ranking without handles");
                AddressMap::new()
            }
            Err(e) => return Err(e),
        };

        let rows = match scope {
            Scope::User => {
                if address_map.is_empty() {
                    info!(fid, "no followed wallets resolved");
                    return Ok(Vec::new());
                }
                let addresses: Vec<WalletAddress> = address_map.values().cloned().collect();
                self.fetcher.fetch_performance(&addresses, timeframe).await?
            }
            Scope::Global => self.fetcher.fetch_global(timeframe).await?,
        };

        let traders = rank(&address_map, &rows, limit, scope.include_unmatched())?;
        info!(
            fid,
            %timeframe,
            %scope,
            wallets = address_map.len(),
            rows = rows.len(),
            ranked = traders.len(),
            "ranked traders"
        );
        Ok(traders)
    }

    /// Share text using this instance's link.
    pub fn format_share_text(
        &self,
        traders: &[RankedTrader],
        timeframe: Timeframe,
        scope_label: &str,
    ) -> String {
        self.share.format(traders, timeframe, scope_label)
    }

    pub fn clear_caches(&self) {
        self.address_cache.clear();
        self.performance_cache.clear();
    }
}
