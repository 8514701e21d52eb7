//! Swap quoting and execution.
//!
//! Quotes are priced from oracle token prices (see
//! [`pioswap_domain::math::oracle_pricing`]); executing a swap records it and
//! bumps the pool and protocol volume counters. Reserves are not moved by
//! swaps.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::journal::RollbackJournal;
use crate::locks::{KeyedLocks, LockKey};
use crate::pool_ledger::PoolLedger;
use crate::registry::TokenRegistry;
use crate::stats::StatsAggregator;
use pioswap_data::{LedgerStore, TransactionStore};
use pioswap_domain::entities::{PoolId, Transaction};
use pioswap_domain::enums::TransactionType;
use pioswap_domain::math::oracle_pricing;
use pioswap_domain::value_objects::{Address, Percentage};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// A priced swap quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapQuote {
    /// Token sold.
    pub token_in: Address,
    /// Token bought.
    pub token_out: Address,
    /// Amount of `token_in` sold.
    pub amount_in: Decimal,
    /// Net of fee.
    pub amount_out: Decimal,
    /// Gross output at the oracle rate.
    pub amount_out_before_fee: Decimal,
    /// Units of `token_out` per unit of `token_in`.
    pub exchange_rate: Decimal,
    /// Fee charged, in `token_out` units.
    pub fee: Decimal,
    /// Fee tier (percent) the quote was priced with.
    pub fee_tier: Decimal,
    /// Estimated price impact in percent.
    pub price_impact: Decimal,
    /// `amount_out` less the configured slippage.
    pub minimum_received: Decimal,
    /// The pool the swap would route through; empty without a pool.
    pub route: Vec<PoolId>,
}

/// Input for [`SwapEngine::execute`].
#[derive(Debug, Clone, Deserialize)]
pub struct ExecuteSwap {
    /// Wallet that executed the swap.
    pub wallet_address: Address,
    /// Token sold.
    pub token_in: Address,
    /// Token bought.
    pub token_out: Address,
    /// Amount of `token_in` sold; must be positive.
    pub amount_in: Decimal,
    /// Amount of `token_out` received, as reported by the client.
    pub amount_out: Decimal,
    /// Chain transaction hash; retries with the same hash are recorded once.
    #[serde(default)]
    pub tx_hash: Option<String>,
}

/// Prices and records swaps.
#[derive(Clone)]
pub struct SwapEngine {
    store: Arc<dyn LedgerStore>,
    locks: KeyedLocks,
    registry: TokenRegistry,
    pools: PoolLedger,
    stats: StatsAggregator,
    config: LedgerConfig,
}

impl SwapEngine {
    /// Creates an engine over the shared store and lock table.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        locks: KeyedLocks,
        registry: TokenRegistry,
        pools: PoolLedger,
        stats: StatsAggregator,
        config: LedgerConfig,
    ) -> Self {
        Self {
            store,
            locks,
            registry,
            pools,
            stats,
            config,
        }
    }

    /// Quotes `amount_in` of `token_in` into `token_out`.
    ///
    /// The fee tier comes from the pair's pool when one exists.
    ///
    /// # Errors
    /// - `InvalidAmount` for a non-positive amount
    /// - `TokensNotFound` if either token is unregistered
    /// - `InvalidPrice` when `token_out` has no price
    pub async fn quote(
        &self,
        token_in: &Address,
        token_out: &Address,
        amount_in: Decimal,
    ) -> LedgerResult<SwapQuote> {
        if amount_in <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(
                "amount_in must be positive".into(),
            ));
        }
        let (input, output) = self.registry.resolve_pair(token_in, token_out).await?;
        let pool = self.pools.find_pool_for_pair(token_in, token_out, None).await?;
        let fee_tier = pool
            .as_ref()
            .map_or(self.config.default_fee_tier, |p| p.fee);

        let breakdown = oracle_pricing::quote(
            amount_in,
            input.price,
            output.price,
            Percentage(fee_tier),
            Percentage(self.config.default_slippage),
        )?;

        Ok(SwapQuote {
            token_in: input.address,
            token_out: output.address,
            amount_in,
            amount_out: breakdown.amount_out,
            amount_out_before_fee: breakdown.amount_out_before_fee,
            exchange_rate: breakdown.exchange_rate,
            fee: breakdown.fee,
            fee_tier,
            price_impact: breakdown.price_impact,
            minimum_received: breakdown.minimum_received,
            route: pool.map(|p| p.id).into_iter().collect(),
        })
    }

    /// Records a swap reported by a client.
    ///
    /// `tx_hash` is trimmed and lower-cased. A retry carrying the hash of
    /// an already recorded swap returns the recorded entry and changes
    /// nothing.
    ///
    /// # Errors
    /// - `InvalidAmount` for a non-positive `amount_in` or negative
    ///   `amount_out`
    /// - `InvalidInput` if `tx_hash` belongs to a non-swap entry
    /// - `TokensNotFound` if either token is unregistered
    pub async fn execute(&self, request: ExecuteSwap) -> LedgerResult<Transaction> {
        if request.amount_in <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(
                "amount_in must be positive".into(),
            ));
        }
        if request.amount_out.is_sign_negative() {
            return Err(LedgerError::InvalidAmount(
                "amount_out must not be negative".into(),
            ));
        }
        let tx_hash = request
            .tx_hash
            .as_deref()
            .map(str::trim)
            .filter(|hash| !hash.is_empty())
            .map(str::to_lowercase);

        let _hash_guard = match &tx_hash {
            Some(hash) => Some(self.locks.lock(LockKey::Swap(hash.clone())).await),
            None => None,
        };
        if let Some(hash) = &tx_hash
            && let Some(recorded) = self.store.find_transaction_by_hash(hash).await?
        {
            if recorded.kind != TransactionType::Swap {
                return Err(LedgerError::InvalidInput(format!(
                    "tx_hash {hash} is already recorded for a {} transaction",
                    recorded.kind
                )));
            }
            info!(tx_hash = %hash, tx_id = %recorded.id, "Swap already recorded");
            return Ok(recorded);
        }

        let (input, _) = self
            .registry
            .resolve_pair(&request.token_in, &request.token_out)
            .await?;
        let volume = request
            .amount_in
            .checked_mul(input.price)
            .ok_or_else(LedgerError::overflow)?;

        let tx = Transaction::confirmed(
            TransactionType::Swap,
            request.wallet_address,
            request.token_in,
            request.token_out,
            request.amount_in,
            request.amount_out,
        )
        .with_tx_hash(tx_hash);

        if let Err(err) = self.stats.ensure_seeded().await {
            warn!(error = %err, "Stats not seeded before swap");
        }

        let pool = self
            .pools
            .find_pool_for_pair(&tx.token0_address, &tx.token1_address, None)
            .await?;
        match pool {
            Some(pool) => {
                let _pool_guard = self.locks.lock(LockKey::Pool(pool.id)).await;
                let pool = self.pools.get_pool(pool.id).await?;
                let updated = pool.with_volume(volume).ok_or_else(LedgerError::overflow)?;

                let mut journal = RollbackJournal::new(self.store.as_ref());
                let outcome = async {
                    journal.write_pool(&pool, &updated).await?;
                    journal.append(&tx).await
                }
                .await;
                journal.settle(outcome).await?;
            }
            None => self.store.append_transaction(&tx).await?,
        }

        if let Err(err) = self.stats.record_swap(volume).await {
            // the swap is durable; a refresh rebuilds the counters
            warn!(error = %err, tx_id = %tx.id, "Stats counters not updated");
        }

        info!(
            tx_id = %tx.id,
            wallet = %tx.wallet_address,
            token_in = %tx.token0_address,
            token_out = %tx.token1_address,
            amount_in = %tx.amount0,
            %volume,
            "Swap recorded"
        );
        Ok(tx)
    }
}
