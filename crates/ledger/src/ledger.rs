//! The engine facade.

use crate::config::LedgerConfig;
use crate::history::History;
use crate::locks::KeyedLocks;
use crate::pool_ledger::PoolLedger;
use crate::position_ledger::PositionLedger;
use crate::registry::TokenRegistry;
use crate::stats::StatsAggregator;
use crate::swap::SwapEngine;
use pioswap_data::LedgerStore;
use std::sync::Arc;
use tracing::info;

/// Every ledger component wired over one store and one lock table.
///
/// Cloning is cheap; clones share the store and the locks, so a single
/// `Ledger` can be handed to every request handler.
#[derive(Clone)]
pub struct Ledger {
    config: LedgerConfig,
    registry: TokenRegistry,
    pools: PoolLedger,
    positions: PositionLedger,
    swaps: SwapEngine,
    history: History,
    stats: StatsAggregator,
}

impl Ledger {
    /// Wires every component over one store and one lock table.
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        let locks = KeyedLocks::new();
        let registry = TokenRegistry::new(store.clone(), config.clone());
        let pools = PoolLedger::new(
            store.clone(),
            locks.clone(),
            registry.clone(),
            config.clone(),
        );
        let positions =
            PositionLedger::new(store.clone(), locks.clone(), pools.clone(), config.clone());
        let stats = StatsAggregator::new(store.clone(), locks.clone(), config.clone());
        let swaps = SwapEngine::new(
            store.clone(),
            locks,
            registry.clone(),
            pools.clone(),
            stats.clone(),
            config.clone(),
        );
        let history = History::new(store, config.clone());

        info!(
            default_fee_tier = %config.default_fee_tier,
            max_page_size = config.max_page_size,
            "Ledger initialized"
        );
        Self {
            config,
            registry,
            pools,
            positions,
            swaps,
            history,
            stats,
        }
    }

    /// The configuration every component shares.
    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    /// Token registration and lookups.
    pub fn registry(&self) -> &TokenRegistry {
        &self.registry
    }

    /// Pool registration and reserve accounting.
    pub fn pools(&self) -> &PoolLedger {
        &self.pools
    }

    /// Liquidity positions.
    pub fn positions(&self) -> &PositionLedger {
        &self.positions
    }

    /// Swap quotes and execution.
    pub fn swaps(&self) -> &SwapEngine {
        &self.swaps
    }

    /// Read views over the transaction log.
    pub fn history(&self) -> &History {
        &self.history
    }

    /// Protocol statistics.
    pub fn stats(&self) -> &StatsAggregator {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorKind, LedgerError};
    use crate::pool_ledger::NewPool;
    use crate::swap::ExecuteSwap;
    use crate::test_support::{PIO, USDT, addr, seeded_store};
    use rust_decimal_macros::dec;

    async fn ledger() -> Ledger {
        Ledger::new(seeded_store().await, LedgerConfig::default())
    }

    #[tokio::test]
    async fn test_creator_gated_pool_through_facade() {
        let ledger = ledger().await;
        let creator = addr("0xaaaa");
        let pool = ledger
            .pools()
            .register_pool(
                NewPool::new(addr(PIO), addr(USDT), dec!(0.3)).with_creator(creator.clone()),
            )
            .await
            .unwrap();

        let err = ledger
            .pools()
            .add_pool_liquidity(pool.id, &addr("0xbbbb"), dec!(100), dec!(245))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized));
        assert_eq!(err.kind(), ErrorKind::Unauthorized);

        let funded = ledger
            .pools()
            .add_pool_liquidity(pool.id, &creator, dec!(100), dec!(245))
            .await
            .unwrap();
        assert_eq!(funded.token0_reserve, dec!(100));
        assert_eq!(funded.token1_reserve, dec!(245));
        assert_eq!(funded.tvl, dec!(490));
    }

    #[tokio::test]
    async fn test_concurrent_reserve_adjustments_are_not_lost() {
        let ledger = ledger().await;
        let pool = ledger
            .pools()
            .register_pool(NewPool::new(addr(PIO), addr(USDT), dec!(0.3)))
            .await
            .unwrap();
        let caller = addr("0xcccc");

        let first = {
            let ledger = ledger.clone();
            let caller = caller.clone();
            tokio::spawn(async move {
                ledger
                    .pools()
                    .adjust_reserves(pool.id, dec!(10), dec!(10), &caller)
                    .await
            })
        };
        let second = {
            let ledger = ledger.clone();
            let caller = caller.clone();
            tokio::spawn(async move {
                ledger
                    .pools()
                    .adjust_reserves(pool.id, dec!(10), dec!(10), &caller)
                    .await
            })
        };
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let pool = ledger.pools().get_pool(pool.id).await.unwrap();
        assert_eq!(pool.token0_reserve, dec!(20));
        assert_eq!(pool.token1_reserve, dec!(20));
    }

    #[tokio::test]
    async fn test_swap_shows_up_in_history_and_stats() {
        let ledger = ledger().await;
        ledger
            .pools()
            .register_pool(NewPool::new(addr(PIO), addr(USDT), dec!(0.3)))
            .await
            .unwrap();

        ledger
            .swaps()
            .execute(ExecuteSwap {
                wallet_address: addr("0xdddd"),
                token_in: addr(PIO),
                token_out: addr(USDT),
                amount_in: dec!(100),
                amount_out: dec!(244.265),
                tx_hash: Some("0xfeed".into()),
            })
            .await
            .unwrap();

        let trades = ledger
            .history()
            .trade_history(&addr(USDT), &addr(PIO), 10)
            .await
            .unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].token0_amount, dec!(244.265));

        let stats = ledger.stats().get_stats().await.unwrap();
        assert_eq!(stats.total_volume, dec!(245));
        assert_eq!(stats.transactions_24h, 1);
        assert_eq!(stats.active_pools, 1);
    }
}
