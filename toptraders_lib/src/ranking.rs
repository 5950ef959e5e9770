//! Joins performance rows with handles and selects the top traders.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::address::WalletAddress;
use crate::error::TopTradersError;
use crate::model::{AddressMap, PerformanceRow, RankedTrader};
use crate::validation::validate_limit;

/// Number of traders returned when the caller does not ask for a limit.
pub const DEFAULT_LIMIT: i64 = 5;

/// Ranks `rows` by earnings, highest first, and keeps the top `limit`.
///
/// Rows are matched to handles through `address_map`. Rows for wallets no
/// followed account claims are dropped unless `include_unmatched` is set, in
/// which case they are labelled with the abbreviated address. Only the first
/// row per wallet counts. Ties keep their input order.
pub fn rank(
    address_map: &AddressMap,
    rows: &[PerformanceRow],
    limit: i64,
    include_unmatched: bool,
) -> Result<Vec<RankedTrader>, TopTradersError> {
    let limit = validate_limit(limit)?;

    // Several handles may claim one wallet; the map's key order picks the owner.
    let mut owners: HashMap<&WalletAddress, &str> = HashMap::new();
    for (handle, address) in address_map {
        owners.entry(address).or_insert(handle.as_str());
    }

    let mut seen: HashSet<&WalletAddress> = HashSet::new();
    let mut traders: Vec<RankedTrader> = rows
        .iter()
        .filter(|row| seen.insert(&row.wallet_address))
        .filter_map(|row| {
            let handle = match owners.get(&row.wallet_address) {
                Some(handle) => handle.to_string(),
                None if include_unmatched => row.wallet_address.short(),
                None => return None,
            };
            Some(RankedTrader {
                handle,
                wallet_address: row.wallet_address.clone(),
                earnings: row.earnings,
                volume: row.volume,
                top_token: row.top_token.clone(),
                rank: 0,
            })
        })
        .collect();

    // `-0.0` and `0.0` must tie; providers send both for flat wallets.
    traders.sort_by(|a, b| {
        b.earnings
            .partial_cmp(&a.earnings)
            .unwrap_or(Ordering::Equal)
    });
    traders.truncate(limit);
    for (i, trader) in traders.iter_mut().enumerate() {
        trader.rank = i as u32 + 1;
    }
    Ok(traders)
}
