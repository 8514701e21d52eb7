//! Protocol statistics.
//!
//! Stats are derived data. `compute_stats` is a pure read; `refresh`
//! rebuilds and stores the singleton; `record_swap` bumps the running
//! counters between refreshes, seeding them from a rebuild when the
//! singleton is missing.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::locks::{KeyedLocks, LockKey};
use chrono::Utc;
use pioswap_data::{
    LedgerStore, PoolStore, StatsStore, TokenStore, TransactionFilter, TransactionStore,
};
use pioswap_domain::entities::ProtocolStats;
use pioswap_domain::enums::TransactionType;
use pioswap_domain::value_objects::Address;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};

/// Lifetime volume estimate used when no swap can be priced.
const VOLUME_FALLBACK_DAYS: Decimal = Decimal::from_parts(30, 0, 0, false, 0);

/// Computes and maintains the stats singleton.
#[derive(Clone)]
pub struct StatsAggregator {
    store: Arc<dyn LedgerStore>,
    locks: KeyedLocks,
    config: LedgerConfig,
}

impl StatsAggregator {
    /// Creates an aggregator that serialises writes on the stats lock.
    pub fn new(store: Arc<dyn LedgerStore>, locks: KeyedLocks, config: LedgerConfig) -> Self {
        Self {
            store,
            locks,
            config,
        }
    }

    /// Recomputes the stats from pools and the log without writing.
    ///
    /// `total_volume` is carried over from the stored singleton and
    /// `updated_at` is left unset, so repeated calls over unchanged data
    /// return equal values.
    pub async fn compute_stats(&self) -> LedgerResult<ProtocolStats> {
        let scan = self.config.stats_scan_limit;
        let pools = self.store.list_pools(scan).await?;
        let log = self
            .store
            .find_transactions(&TransactionFilter::all(), scan)
            .await?;

        let mut tvl = Decimal::ZERO;
        let mut volume_24h = Decimal::ZERO;
        for pool in &pools {
            tvl = tvl.checked_add(pool.tvl).ok_or_else(LedgerError::overflow)?;
            volume_24h = volume_24h
                .checked_add(pool.volume_24h)
                .ok_or_else(LedgerError::overflow)?;
        }
        let swappers: HashSet<&Address> = log.iter().map(|tx| &tx.wallet_address).collect();

        let total_volume = self
            .store
            .get_stats()
            .await?
            .map(|stored| stored.total_volume)
            .unwrap_or_default();

        Ok(ProtocolStats {
            total_volume,
            tvl,
            total_swappers: swappers.len() as u64,
            volume_24h,
            transactions_24h: log.len() as u64,
            active_pools: self.store.count_pools().await?,
            updated_at: None,
        })
    }

    /// Rebuilds the singleton, pricing lifetime volume from logged swaps at
    /// the input token's current price, and stores it.
    pub async fn refresh(&self) -> LedgerResult<ProtocolStats> {
        let _guard = self.locks.lock(LockKey::Stats).await;
        let stats = self.rebuild().await?;

        info!(
            tvl = %stats.tvl,
            total_volume = %stats.total_volume,
            swappers = stats.total_swappers,
            pools = stats.active_pools,
            "Stats refreshed"
        );
        Ok(stats)
    }

    /// The stored singleton with a live pool count, or a fresh refresh when
    /// nothing is stored yet.
    pub async fn get_stats(&self) -> LedgerResult<ProtocolStats> {
        match self.store.get_stats().await? {
            Some(mut stats) => {
                stats.active_pools = self.store.count_pools().await?;
                Ok(stats)
            }
            None => self.refresh().await,
        }
    }

    /// Stores a rebuilt singleton if none exists yet.
    ///
    /// Swaps call this before appending to the log, so the counters they
    /// bump afterwards start from the pools and log as they were.
    pub async fn ensure_seeded(&self) -> LedgerResult<()> {
        let _guard = self.locks.lock(LockKey::Stats).await;
        if self.store.get_stats().await?.is_none() {
            let seeded = self.rebuild().await?;
            debug!(tvl = %seeded.tvl, "Stats seeded");
        }
        Ok(())
    }

    /// Adds one swap worth `volume` quote units to the running counters,
    /// rebuilding the singleton first when nothing is stored.
    pub async fn record_swap(&self, volume: Decimal) -> LedgerResult<ProtocolStats> {
        let _guard = self.locks.lock(LockKey::Stats).await;

        let current = match self.store.get_stats().await? {
            Some(stats) => stats,
            None => self.rebuild().await?,
        };
        let next = current
            .with_swap(volume)
            .ok_or_else(LedgerError::overflow)?;
        self.store.replace_stats(&next).await?;

        debug!(%volume, total_volume = %next.total_volume, "Swap counted");
        Ok(next)
    }

    /// Recomputes and stores the singleton. Callers hold the stats lock.
    async fn rebuild(&self) -> LedgerResult<ProtocolStats> {
        let mut stats = self.compute_stats().await?;
        let swap_value = self.priced_swap_volume().await?;
        stats.total_volume = if swap_value > Decimal::ZERO {
            swap_value
        } else {
            stats
                .volume_24h
                .checked_mul(VOLUME_FALLBACK_DAYS)
                .ok_or_else(LedgerError::overflow)?
        };
        stats.updated_at = Some(Utc::now());
        self.store.replace_stats(&stats).await?;
        Ok(stats)
    }

    async fn priced_swap_volume(&self) -> LedgerResult<Decimal> {
        let swaps = self
            .store
            .find_transactions(
                &TransactionFilter::all().of_kind(TransactionType::Swap),
                self.config.stats_scan_limit,
            )
            .await?;

        let mut prices: HashMap<Address, Option<Decimal>> = HashMap::new();
        let mut total = Decimal::ZERO;
        for swap in &swaps {
            let price = match prices.get(&swap.token0_address) {
                Some(cached) => *cached,
                None => {
                    let price = self
                        .store
                        .find_token(&swap.token0_address)
                        .await?
                        .map(|t| t.price);
                    prices.insert(swap.token0_address.clone(), price);
                    price
                }
            };
            // swaps of since-removed tokens carry no value
            let Some(price) = price else { continue };
            let value = swap
                .amount0
                .checked_mul(price)
                .ok_or_else(LedgerError::overflow)?;
            total = total.checked_add(value).ok_or_else(LedgerError::overflow)?;
        }
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PETH, PIO, USDT, addr, seeded_store};
    use pioswap_domain::entities::{Pool, Transaction};
    use rust_decimal_macros::dec;

    async fn fixture() -> (Arc<dyn LedgerStore>, StatsAggregator) {
        let store = seeded_store().await;
        let stats = StatsAggregator::new(store.clone(), KeyedLocks::new(), LedgerConfig::default());
        (store, stats)
    }

    fn swap(wallet: &str, token0: &str, token1: &str, a0: Decimal, a1: Decimal) -> Transaction {
        Transaction::confirmed(
            TransactionType::Swap,
            addr(wallet),
            addr(token0),
            addr(token1),
            a0,
            a1,
        )
    }

    async fn add_pool(store: &Arc<dyn LedgerStore>, tvl: Decimal, volume: Decimal) {
        let mut pool = Pool::new(addr(PIO), addr(USDT), dec!(0.3));
        pool.tvl = tvl;
        pool.volume_24h = volume;
        store.upsert_pool(&pool).await.unwrap();
    }

    #[tokio::test]
    async fn test_compute_stats_sums_pools_and_log() {
        let (store, stats) = fixture().await;
        add_pool(&store, dec!(490), dec!(100)).await;
        add_pool(&store, dec!(10), dec!(5)).await;
        for tx in [
            swap("0xa", PIO, USDT, dec!(1), dec!(2.45)),
            swap("0xA", USDT, PIO, dec!(2.45), dec!(1)),
            swap("0xb", PETH, USDT, dec!(1), dec!(2320.5)),
        ] {
            store.append_transaction(&tx).await.unwrap();
        }

        let computed = stats.compute_stats().await.unwrap();
        assert_eq!(computed.tvl, dec!(500));
        assert_eq!(computed.volume_24h, dec!(105));
        assert_eq!(computed.total_swappers, 2);
        assert_eq!(computed.transactions_24h, 3);
        assert_eq!(computed.active_pools, 2);
        assert_eq!(computed.total_volume, Decimal::ZERO);
        assert!(computed.updated_at.is_none());
    }

    #[tokio::test]
    async fn test_compute_stats_is_idempotent() {
        let (store, stats) = fixture().await;
        add_pool(&store, dec!(490), dec!(100)).await;
        store
            .append_transaction(&swap("0xa", PIO, USDT, dec!(1), dec!(2.45)))
            .await
            .unwrap();
        stats.refresh().await.unwrap();

        let first = stats.compute_stats().await.unwrap();
        let second = stats.compute_stats().await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.total_volume, dec!(2.45));
    }

    #[tokio::test]
    async fn test_refresh_prices_swaps_at_token0() {
        let (store, stats) = fixture().await;
        add_pool(&store, dec!(490), dec!(100)).await;
        store
            .append_transaction(&swap("0xa", PIO, USDT, dec!(100), dec!(244.265)))
            .await
            .unwrap();
        store
            .append_transaction(&swap("0xb", USDT, PIO, dec!(10), dec!(4)))
            .await
            .unwrap();

        let refreshed = stats.refresh().await.unwrap();
        assert_eq!(refreshed.total_volume, dec!(255));
        assert!(refreshed.updated_at.is_some());
        assert_eq!(store.get_stats().await.unwrap(), Some(refreshed));
    }

    #[tokio::test]
    async fn test_refresh_falls_back_to_pool_volume() {
        let (store, stats) = fixture().await;
        add_pool(&store, dec!(490), dec!(100)).await;
        let refreshed = stats.refresh().await.unwrap();
        assert_eq!(refreshed.total_volume, dec!(3000));
    }

    #[tokio::test]
    async fn test_get_stats_refreshes_once_then_tracks_pool_count() {
        let (store, stats) = fixture().await;
        add_pool(&store, dec!(1), dec!(0)).await;
        let first = stats.get_stats().await.unwrap();
        assert_eq!(first.active_pools, 1);
        assert!(first.updated_at.is_some());

        add_pool(&store, dec!(1), dec!(0)).await;
        let second = stats.get_stats().await.unwrap();
        assert_eq!(second.active_pools, 2);
        assert_eq!(second.updated_at, first.updated_at);
    }

    #[tokio::test]
    async fn test_record_swap_counters_are_not_lost() {
        let (_, stats) = fixture().await;
        let mut handles = Vec::new();
        for _ in 0..10 {
            let stats = stats.clone();
            handles.push(tokio::spawn(async move { stats.record_swap(dec!(1.5)).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        let current = stats.get_stats().await.unwrap();
        assert_eq!(current.transactions_24h, 10);
        assert_eq!(current.total_volume, dec!(15));
        assert_eq!(current.volume_24h, dec!(15));
    }

    #[tokio::test]
    async fn test_record_swap_seeds_missing_singleton_from_pools() {
        let (store, stats) = fixture().await;
        add_pool(&store, dec!(490), dec!(0)).await;
        assert!(store.get_stats().await.unwrap().is_none());

        let recorded = stats.record_swap(dec!(2.45)).await.unwrap();
        assert_eq!(recorded.tvl, dec!(490));
        assert_eq!(recorded.active_pools, 1);
        assert_eq!(recorded.total_volume, dec!(2.45));
        assert_eq!(recorded.transactions_24h, 1);
        assert_eq!(store.get_stats().await.unwrap(), Some(recorded));
    }

    #[tokio::test]
    async fn test_ensure_seeded_keeps_existing_singleton() {
        let (store, stats) = fixture().await;
        stats.record_swap(dec!(1)).await.unwrap();
        add_pool(&store, dec!(490), dec!(0)).await;

        stats.ensure_seeded().await.unwrap();
        let stored = store.get_stats().await.unwrap().unwrap();
        assert_eq!(stored.tvl, Decimal::ZERO);
        assert_eq!(stored.transactions_24h, 1);
    }
}
