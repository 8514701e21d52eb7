//! Position ledger: per-wallet deposits and withdrawals.
//!
//! A position change, the matching pool reserve change and the log entry
//! are written under the pool lock and rolled back together.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::journal::RollbackJournal;
use crate::locks::{KeyedLocks, LockKey};
use crate::pool_ledger::PoolLedger;
use pioswap_data::{LedgerStore, PositionStore};
use pioswap_domain::entities::{PoolId, Position, PositionId, Transaction};
use pioswap_domain::enums::TransactionType;
use pioswap_domain::value_objects::{Address, Percentage, Price, PriceRange};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Input for [`PositionLedger::add_liquidity`].
#[derive(Debug, Clone, Deserialize)]
pub struct AddLiquidity {
    /// Pool receiving the deposit.
    pub pool_id: PoolId,
    /// Depositing wallet; owns the position.
    pub wallet_address: Address,
    /// `token0` deposited.
    #[serde(rename = "token0_amount")]
    pub amount0: Decimal,
    /// `token1` deposited.
    #[serde(rename = "token1_amount")]
    pub amount1: Decimal,
    /// Lower range bound; zero when absent.
    #[serde(default)]
    pub min_price: Option<Decimal>,
    /// `None` leaves the range unbounded above.
    #[serde(default)]
    pub max_price: Option<Decimal>,
}

impl AddLiquidity {
    fn range(&self) -> LedgerResult<PriceRange> {
        let range = PriceRange::new(
            Price::new(self.min_price.unwrap_or_default()),
            self.max_price.map(Price::new),
        );
        if !range.is_well_formed() {
            return Err(LedgerError::InvalidInput(
                "price range must satisfy 0 <= min_price <= max_price".into(),
            ));
        }
        Ok(range)
    }
}

/// Owns liquidity positions.
#[derive(Clone)]
pub struct PositionLedger {
    store: Arc<dyn LedgerStore>,
    locks: KeyedLocks,
    pools: PoolLedger,
    config: LedgerConfig,
}

impl PositionLedger {
    /// Creates a position ledger sharing the pool ledger's locks.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        locks: KeyedLocks,
        pools: PoolLedger,
        config: LedgerConfig,
    ) -> Self {
        Self {
            store,
            locks,
            pools,
            config,
        }
    }

    /// Deposits into the caller's position in a pool, opening it if needed.
    ///
    /// # Errors
    /// - `InvalidAmount` unless both amounts are positive
    /// - `InvalidInput` for an inverted price range
    /// - `PoolNotFound`, `Unauthorized` (creator-gated pool)
    pub async fn add_liquidity(&self, request: AddLiquidity) -> LedgerResult<Position> {
        if request.amount0 <= Decimal::ZERO || request.amount1 <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(
                "both amounts must be positive".into(),
            ));
        }
        let range = request.range()?;
        let wallet = &request.wallet_address;

        let _guard = self.locks.lock(LockKey::Pool(request.pool_id)).await;

        let pool = self.pools.get_pool(request.pool_id).await?;
        self.pools.authorize(&pool, wallet)?;

        let existing = self.store.find_position(wallet, pool.id).await?;
        let position = match &existing {
            Some(current) => current
                .deposit(request.amount0, request.amount1, range)
                .ok_or_else(LedgerError::overflow)?,
            None => Position::open(
                pool.id,
                wallet.clone(),
                request.amount0,
                request.amount1,
                range,
            ),
        };
        let repriced = self
            .pools
            .repriced(&pool, request.amount0, request.amount1)
            .await?;
        let tx = Transaction::confirmed(
            TransactionType::Add,
            wallet.clone(),
            pool.token0_address.clone(),
            pool.token1_address.clone(),
            request.amount0,
            request.amount1,
        );

        let mut journal = RollbackJournal::new(self.store.as_ref());
        let outcome = async {
            journal.write_position(existing.as_ref(), &position).await?;
            journal.write_pool(&pool, &repriced).await?;
            journal.append(&tx).await
        }
        .await;
        journal.settle(outcome).await?;

        info!(
            position_id = %position.id,
            pool_id = %pool.id,
            wallet = %wallet,
            amount0 = %request.amount0,
            amount1 = %request.amount1,
            liquidity = %position.liquidity,
            "Liquidity added"
        );
        Ok(position)
    }

    /// Withdraws `percent` (clamped to `[0, 100]`) of a position.
    ///
    /// At 100 % the position is deleted and its closed representation is
    /// returned.
    ///
    /// # Errors
    /// - `PositionNotFound` unless `wallet` owns `position_id`
    /// - `InvalidPercent` when the clamped percent is zero
    /// - `PoolNotFound`, `Unauthorized` (creator-gated pool)
    pub async fn remove_liquidity(
        &self,
        position_id: PositionId,
        wallet: &Address,
        percent: Decimal,
    ) -> LedgerResult<Position> {
        let percent = Percentage::clamped(percent);
        if percent.is_zero() {
            return Err(LedgerError::InvalidPercent(
                "percent must be greater than 0".into(),
            ));
        }

        let pool_id = self.owned_position(position_id, wallet).await?.pool_id;
        let _guard = self.locks.lock(LockKey::Pool(pool_id)).await;
        // re-read under the lock; a concurrent withdrawal may have closed it
        let position = self.owned_position(position_id, wallet).await?;

        let pool = self.pools.get_pool(pool_id).await?;
        self.pools.authorize(&pool, wallet)?;

        let withdrawal = position
            .withdrawal(percent)
            .ok_or_else(LedgerError::overflow)?;
        let repriced = self
            .pools
            .repriced(&pool, -withdrawal.amount0, -withdrawal.amount1)
            .await?;
        let tx = Transaction::confirmed(
            TransactionType::Remove,
            wallet.clone(),
            pool.token0_address.clone(),
            pool.token1_address.clone(),
            withdrawal.amount0,
            withdrawal.amount1,
        );

        let result = if withdrawal.closes_position {
            position.closed()
        } else {
            position.after_withdrawal(&withdrawal)
        };

        let mut journal = RollbackJournal::new(self.store.as_ref());
        let outcome = async {
            if withdrawal.closes_position {
                journal.delete_position(&position).await?;
            } else {
                journal.write_position(Some(&position), &result).await?;
            }
            journal.write_pool(&pool, &repriced).await?;
            journal.append(&tx).await
        }
        .await;
        journal.settle(outcome).await?;

        info!(
            position_id = %position_id,
            pool_id = %pool_id,
            wallet = %wallet,
            percent = %percent.0,
            closed = withdrawal.closes_position,
            "Liquidity removed"
        );
        Ok(result)
    }

    /// Lists a wallet's open positions, newest first.
    pub async fn list_positions(&self, wallet: &Address, limit: usize) -> LedgerResult<Vec<Position>> {
        Ok(self
            .store
            .list_positions(wallet, self.config.page_size(limit))
            .await?)
    }

    async fn owned_position(&self, id: PositionId, wallet: &Address) -> LedgerResult<Position> {
        self.store
            .find_position_by_id(id)
            .await?
            .filter(|p| &p.wallet_address == wallet)
            .ok_or(LedgerError::PositionNotFound(id))
    }
}
