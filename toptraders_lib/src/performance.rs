//! Batched, cached wallet performance lookups.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use std::time::Duration;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::address::WalletAddress;
use crate::analytics::WalletPerformance;
use crate::cache::TtlCache;
use crate::error::TopTradersError;
use crate::model::{PerformanceRow, Timeframe};
use crate::provider::AnalyticsProvider;

/// Batches up to this size are keyed by their address list verbatim; larger
/// ones by its digest.
const PLAIN_KEY_MAX_ADDRESSES: usize = 4;

/// Fetches performance rows for address batches, one upstream query per
/// distinct (address set, timeframe) within the TTL.
pub struct PerformanceFetcher {
    provider: Arc<dyn AnalyticsProvider>,
    cache: TtlCache<Vec<PerformanceRow>>,
    ttl: Duration,
    timeout: Duration,
}

impl PerformanceFetcher {
    pub fn new(
        provider: Arc<dyn AnalyticsProvider>,
        cache: TtlCache<Vec<PerformanceRow>>,
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

    /// Performance for `addresses` over `timeframe`, in provider order,
    /// followed by zero rows for requested wallets the provider left out.
    ///
    /// Duplicates and ordering of `addresses` do not affect the query or the
    /// cache key. An empty slice returns an empty result without calling
    /// upstream.
    pub async fn fetch_performance(
        &self,
        addresses: &[WalletAddress],
        timeframe: Timeframe,
    ) -> Result<Vec<PerformanceRow>, TopTradersError> {
        let unique: BTreeSet<&WalletAddress> = addresses.iter().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }
        let batch: Vec<WalletAddress> = unique.into_iter().cloned().collect();
        let key = cache_key(timeframe, &batch);
        self.fetch(key, batch, timeframe).await
    }

    /// The provider's global leaderboard for `timeframe`.
    pub async fn fetch_global(
        &self,
        timeframe: Timeframe,
    ) -> Result<Vec<PerformanceRow>, TopTradersError> {
        let key = format!("performance:global:{}", timeframe);
        self.fetch(key, Vec::new(), timeframe).await
    }

    async fn fetch(
        &self,
        key: String,
        batch: Vec<WalletAddress>,
        timeframe: Timeframe,
    ) -> Result<Vec<PerformanceRow>, TopTradersError> {
        let provider = Arc::clone(&self.provider);
        let timeout = self.timeout;
        debug!(key = %key, addresses = batch.len(), "fetching performance");
        self.cache
            .get_or_compute(&key, self.ttl, move || async move {
                let raw = tokio::time::timeout(timeout, provider.query(&batch, timeframe))
                    .await
                    .map_err(|_| {
                        TopTradersError::UpstreamTimeout(format!(
                            "performance query exceeded {:?}",
                            timeout
                        ))
                    })??;
                Ok(backfill_inactive(normalize_rows(raw), &batch))
            })
            .await
    }
}

/// Cache key for a sorted, deduplicated batch.
fn cache_key(timeframe: Timeframe, batch: &[WalletAddress]) -> String {
    let joined = batch
        .iter()
        .map(WalletAddress::as_str)
        .collect::<Vec<_>>()
        .join(",");
    if batch.len() <= PLAIN_KEY_MAX_ADDRESSES {
        format!("performance:{}:{}", timeframe, joined)
    } else {
        let mut hasher = Sha256::new();
        hasher.update(joined.as_bytes());
        format!("performance:{}:{:x}", timeframe, hasher.finalize())
    }
}

/// Drops rows without a valid address and zero-fills missing metrics.
fn normalize_rows(raw: Vec<WalletPerformance>) -> Vec<PerformanceRow> {
    raw.into_iter()
        .filter_map(|row| {
            let Some(wallet_address) = row.address.as_deref().and_then(WalletAddress::parse)
            else {
                warn!(address = ?row.address, "dropping performance row with invalid address");
                return None;
            };
            Some(PerformanceRow {
                wallet_address,
                earnings: row.earnings.unwrap_or(0.0),
                volume: row.volume.unwrap_or(0.0),
                top_token: row.top_token.filter(|t| !t.trim().is_empty()),
            })
        })
        .collect()
}

/// Appends a zero row for each requested wallet the provider did not report,
/// so inactive wallets still rank. A global query requests none.
fn backfill_inactive(
    mut rows: Vec<PerformanceRow>,
    batch: &[WalletAddress],
) -> Vec<PerformanceRow> {
    let reported: HashSet<WalletAddress> =
        rows.iter().map(|row| row.wallet_address.clone()).collect();
    for address in batch {
        if !reported.contains(address) {
            debug!(address = %address, "no activity reported, using zero metrics");
            rows.push(PerformanceRow {
                wallet_address: address.clone(),
                earnings: 0.0,
                volume: 0.0,
                top_token: None,
            });
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    const A: &str = "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const B: &str = "0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    /// Analytics fake that records each query.
    struct FakeAnalytics {
        rows: Vec<WalletPerformance>,
        fail: bool,
        delay: Duration,
        calls: AtomicUsize,
        seen: Mutex<Vec<Vec<String>>>,
    }

    impl FakeAnalytics {
        fn returning(rows: Vec<WalletPerformance>) -> Self {
            Self {
                rows,
                fail: false,
                delay: Duration::from_millis(10),
                calls: AtomicUsize::new(0),
                seen: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl AnalyticsProvider for FakeAnalytics {
        async fn query(
            &self,
            addresses: &[WalletAddress],
            _timeframe: Timeframe,
        ) -> Result<Vec<WalletPerformance>, TopTradersError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.seen
                .lock()
                .unwrap()
                .push(addresses.iter().map(|a| a.to_string()).collect());
            tokio::time::sleep(self.delay).await;
            if self.fail {
                return Err(TopTradersError::UpstreamUnavailable("503".to_string()));
            }
            Ok(self.rows.clone())
        }
    }

    fn row(address: &str, earnings: Option<f64>, volume: Option<f64>) -> WalletPerformance {
        WalletPerformance {
            address: Some(address.to_string()),
            earnings,
            volume,
            top_token: Some("DEGEN".to_string()),
        }
    }

    fn addr(s: &str) -> WalletAddress {
        WalletAddress::parse(s).unwrap()
    }

    fn fetcher(provider: Arc<FakeAnalytics>) -> PerformanceFetcher {
        PerformanceFetcher::new(
            provider,
            TtlCache::new(),
            Duration::from_secs(300),
            Duration::from_secs(8),
        )
    }

    #[tokio::test(start_paused = true)]
    async fn repeat_within_ttl_hits_upstream_once() {
        let provider = Arc::new(FakeAnalytics::returning(vec![row(A, Some(10.0), Some(5.0))]));
        let fetcher = fetcher(Arc::clone(&provider));

        let first = fetcher
            .fetch_performance(&[addr(A), addr(B)], Timeframe::Day)
            .await
            .unwrap();
        tokio::time::advance(Duration::from_secs(240)).await;
        // Same set, different order and a duplicate.
        let second = fetcher
            .fetch_performance(&[addr(B), addr(A), addr(B)], Timeframe::Day)
            .await
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(provider.calls(), 1);
        assert_eq!(provider.seen.lock().unwrap()[0], vec![A.to_string(), B.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn expired_entry_is_refetched() {
        let provider = Arc::new(FakeAnalytics::returning(vec![row(A, Some(1.0), Some(1.0))]));
        let fetcher = fetcher(Arc::clone(&provider));

        fetcher.fetch_performance(&[addr(A)], Timeframe::Week).await.unwrap();
        tokio::time::advance(Duration::from_secs(301)).await;
        fetcher.fetch_performance(&[addr(A)], Timeframe::Week).await.unwrap();

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn timeframes_are_cached_separately() {
        let provider = Arc::new(FakeAnalytics::returning(Vec::new()));
        let fetcher = fetcher(Arc::clone(&provider));

        fetcher.fetch_performance(&[addr(A)], Timeframe::Day).await.unwrap();
        fetcher.fetch_performance(&[addr(A)], Timeframe::Week).await.unwrap();

        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_identical_queries_share_one_call() {
        let provider = Arc::new(FakeAnalytics::returning(vec![row(A, Some(3.0), None)]));
        let fetcher = fetcher(Arc::clone(&provider));
        let batch = [addr(A)];

        let results = futures::future::join_all(
            (0..10).map(|_| fetcher.fetch_performance(&batch, Timeframe::Day)),
        )
        .await;

        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn empty_batch_skips_upstream() {
        let provider = Arc::new(FakeAnalytics::returning(vec![row(A, Some(1.0), Some(1.0))]));
        let rows = fetcher(Arc::clone(&provider))
            .fetch_performance(&[], Timeframe::Day)
            .await
            .unwrap();

        assert!(rows.is_empty());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn missing_metrics_default_to_zero() {
        let provider = Arc::new(FakeAnalytics::returning(vec![WalletPerformance {
            address: Some(A.to_uppercase().replacen("0X", "0x", 1)),
            earnings: None,
            volume: None,
            top_token: Some("  ".to_string()),
        }]));
        let rows = fetcher(provider)
            .fetch_performance(&[addr(A)], Timeframe::Day)
            .await
            .unwrap();

        assert_eq!(
            rows,
            vec![PerformanceRow {
                wallet_address: addr(A),
                earnings: 0.0,
                volume: 0.0,
                top_token: None,
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn unreported_wallets_get_zero_rows() {
        let provider = Arc::new(FakeAnalytics::returning(vec![row(A, Some(7.0), Some(3.0))]));
        let rows = fetcher(provider)
            .fetch_performance(&[addr(A), addr(B)], Timeframe::Day)
            .await
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].wallet_address, addr(A));
        assert_eq!(rows[0].earnings, 7.0);
        assert_eq!(
            rows[1],
            PerformanceRow {
                wallet_address: addr(B),
                earnings: 0.0,
                volume: 0.0,
                top_token: None,
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn global_leaderboard_is_not_backfilled() {
        let provider = Arc::new(FakeAnalytics::returning(Vec::new()));
        let rows = fetcher(provider).fetch_global(Timeframe::Day).await.unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_addresses_are_dropped() {
        let provider = Arc::new(FakeAnalytics::returning(vec![
            row("0x123", Some(99.0), Some(1.0)),
            WalletPerformance::default(),
            row(B, Some(5.0), Some(2.0)),
        ]));
        let rows = fetcher(provider)
            .fetch_performance(&[addr(B)], Timeframe::Day)
            .await
            .unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].wallet_address, addr(B));
    }

    #[tokio::test(start_paused = true)]
    async fn upstream_failure_propagates_and_is_not_cached() {
        let mut fake = FakeAnalytics::returning(Vec::new());
        fake.fail = true;
        let provider = Arc::new(fake);
        let fetcher = fetcher(Arc::clone(&provider));

        let first = fetcher.fetch_performance(&[addr(A)], Timeframe::Day).await;
        let second = fetcher.fetch_performance(&[addr(A)], Timeframe::Day).await;

        assert!(matches!(first, Err(TopTradersError::UpstreamUnavailable(_))));
        assert!(second.is_err());
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn slow_upstream_times_out() {
        let mut fake = FakeAnalytics::returning(Vec::new());
        fake.delay = Duration::from_secs(60);
        let rows = fetcher(Arc::new(fake))
            .fetch_performance(&[addr(A)], Timeframe::Day)
            .await;

        assert!(matches!(rows, Err(TopTradersError::UpstreamTimeout(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn global_query_sends_no_addresses() {
        let provider = Arc::new(FakeAnalytics::returning(vec![row(A, Some(1.0), Some(1.0))]));
        let fetcher = fetcher(Arc::clone(&provider));

        fetcher.fetch_global(Timeframe::Week).await.unwrap();
        fetcher.fetch_global(Timeframe::Week).await.unwrap();

        assert_eq!(provider.calls(), 1);
        assert!(provider.seen.lock().unwrap()[0].is_empty());
    }

    #[test]
    fn small_batches_key_by_address_list() {
        let key = cache_key(Timeframe::Day, &[addr(A), addr(B)]);
        assert_eq!(key, format!("performance:24h:{},{}", A, B));
    }

    #[test]
    fn large_batches_key_by_digest() {
        let batch: Vec<WalletAddress> = (1..=5)
            .map(|i| addr(&format!("0x{:040x}", i)))
            .collect();
        let key = cache_key(Timeframe::Week, &batch);
        let digest = key.strip_prefix("performance:7d:").unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, cache_key(Timeframe::Week, &batch));
    }
}
