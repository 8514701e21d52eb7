//! Pool ledger: pool registration and reserve accounting.
//!
//! Every reserve change goes through [`PoolLedger::repriced`], which clamps
//! reserves at zero and derives TVL and APR from the current token prices.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use crate::journal::RollbackJournal;
use crate::locks::{KeyedLocks, LockKey};
use crate::registry::TokenRegistry;
use pioswap_data::{LedgerStore, PoolStore};
use pioswap_domain::entities::{Pool, PoolId, Transaction};
use pioswap_domain::enums::TransactionType;
use pioswap_domain::value_objects::{Address, Percentage};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Input for [`PoolLedger::register_pool`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewPool {
    /// First token of the pair.
    #[serde(rename = "token0_address")]
    pub token0: Address,
    /// Second token of the pair.
    #[serde(rename = "token1_address")]
    pub token1: Address,
    /// Fee tier in percent; the configured default when absent.
    #[serde(default)]
    pub fee: Option<Decimal>,
    /// Initial reserves deposited at creation.
    #[serde(default)]
    pub amount0: Option<Decimal>,
    /// Initial `token1` reserve.
    #[serde(default)]
    pub amount1: Option<Decimal>,
    /// Wallet allowed to adjust reserves directly.
    #[serde(default)]
    pub creator_address: Option<Address>,
    /// On-chain pair contract, if one exists.
    #[serde(default)]
    pub pair_address: Option<Address>,
}

impl NewPool {
    /// A pool for `token0`/`token1` at `fee` with no initial reserves.
    #[must_use]
    pub fn new(token0: Address, token1: Address, fee: Decimal) -> Self {
        Self {
            token0,
            token1,
            fee: Some(fee),
            amount0: None,
            amount1: None,
            creator_address: None,
            pair_address: None,
        }
    }

    /// Sets the initial reserves.
    #[must_use]
    pub fn with_reserves(mut self, amount0: Decimal, amount1: Decimal) -> Self {
        self.amount0 = Some(amount0);
        self.amount1 = Some(amount1);
        self
    }

    /// Sets the creator wallet.
    #[must_use]
    pub fn with_creator(mut self, creator: Address) -> Self {
        self.creator_address = Some(creator);
        self
    }
}

/// Owns pool records and their reserve invariants.
#[derive(Clone)]
pub struct PoolLedger {
    store: Arc<dyn LedgerStore>,
    locks: KeyedLocks,
    registry: TokenRegistry,
    config: LedgerConfig,
}

impl PoolLedger {
    /// Creates a pool ledger over the shared store and lock table.
    pub fn new(
        store: Arc<dyn LedgerStore>,
        locks: KeyedLocks,
        registry: TokenRegistry,
        config: LedgerConfig,
    ) -> Self {
        Self {
            store,
            locks,
            registry,
            config,
        }
    }

    /// Creates a pool for an unordered pair and fee tier.
    ///
    /// # Errors
    /// - `InvalidInput` for identical tokens or a fee outside `[0, 100]`
    /// - `InvalidAmount` for negative initial reserves
    /// - `TokensNotFound` if either token is unregistered
    /// - `PoolAlreadyExists` if the pair already has a pool at this fee
    pub async fn register_pool(&self, new: NewPool) -> LedgerResult<Pool> {
        if new.token0 == new.token1 {
            return Err(LedgerError::InvalidInput(
                "a pool needs two different tokens".into(),
            ));
        }
        let fee = new.fee.unwrap_or(self.config.default_fee_tier);
        if fee < Decimal::ZERO || fee > Decimal::ONE_HUNDRED {
            return Err(LedgerError::InvalidInput(format!(
                "fee must be between 0 and 100, got {fee}"
            )));
        }
        let amount0 = new.amount0.unwrap_or_default();
        let amount1 = new.amount1.unwrap_or_default();
        if amount0.is_sign_negative() || amount1.is_sign_negative() {
            return Err(LedgerError::InvalidAmount(
                "initial reserves must not be negative".into(),
            ));
        }

        let (token0, token1) = self.registry.resolve_pair(&new.token0, &new.token1).await?;

        let _guard = self
            .locks
            .lock(LockKey::pair(&token0.address, &token1.address, fee))
            .await;

        if self
            .store
            .find_pool_by_pair(&token0.address, &token1.address, Some(fee))
            .await?
            .is_some()
        {
            return Err(LedgerError::PoolAlreadyExists);
        }

        let pool = Pool::new(token0.address.clone(), token1.address.clone(), fee)
            .with_creator(new.creator_address)
            .with_pair_address(new.pair_address)
            .with_reserve_delta(amount0, amount1, token0.price, token1.price)
            .ok_or_else(LedgerError::overflow)?;
        self.store.upsert_pool(&pool).await?;

        info!(
            pool_id = %pool.id,
            pair = format!("{}/{}", token0.symbol, token1.symbol),
            fee = %pool.fee,
            tvl = %pool.tvl,
            "Pool created"
        );
        Ok(pool)
    }

    /// # Errors
    /// `PoolNotFound` for an unknown ID.
    pub async fn get_pool(&self, id: PoolId) -> LedgerResult<Pool> {
        self.store
            .find_pool(id)
            .await?
            .ok_or(LedgerError::PoolNotFound(id))
    }

    /// Lists pools in creation order; `limit` is clamped to the page bounds.
    pub async fn list_pools(&self, limit: usize) -> LedgerResult<Vec<Pool>> {
        Ok(self.store.list_pools(self.config.page_size(limit)).await?)
    }

    /// The pool for an unordered pair; without a fee, the oldest one.
    pub async fn find_pool_for_pair(
        &self,
        a: &Address,
        b: &Address,
        fee: Option<Decimal>,
    ) -> LedgerResult<Option<Pool>> {
        Ok(self.store.find_pool_by_pair(a, b, fee).await?)
    }

    /// Applies reserve deltas on behalf of `caller`.
    ///
    /// # Errors
    /// `PoolNotFound`, `Unauthorized` for a creator-gated pool and another
    /// caller (reserves untouched), `TokensNotFound` if a token vanished.
    pub async fn adjust_reserves(
        &self,
        pool_id: PoolId,
        delta0: Decimal,
        delta1: Decimal,
        caller: &Address,
    ) -> LedgerResult<Pool> {
        let _guard = self.locks.lock(LockKey::Pool(pool_id)).await;

        let pool = self.get_pool(pool_id).await?;
        self.authorize(&pool, caller)?;
        let updated = self.repriced(&pool, delta0, delta1).await?;
        self.store.upsert_pool(&updated).await?;

        info!(
            pool_id = %pool_id,
            reserve0 = %updated.token0_reserve,
            reserve1 = %updated.token1_reserve,
            tvl = %updated.tvl,
            "Reserves adjusted"
        );
        Ok(updated)
    }

    /// Deposits directly into a pool's reserves and logs an `Add`.
    ///
    /// # Errors
    /// `InvalidAmount` unless both amounts are positive, plus the errors of
    /// [`Self::adjust_reserves`].
    pub async fn add_pool_liquidity(
        &self,
        pool_id: PoolId,
        wallet: &Address,
        amount0: Decimal,
        amount1: Decimal,
    ) -> LedgerResult<Pool> {
        if amount0 <= Decimal::ZERO || amount1 <= Decimal::ZERO {
            return Err(LedgerError::InvalidAmount(
                "both amounts must be positive".into(),
            ));
        }

        let _guard = self.locks.lock(LockKey::Pool(pool_id)).await;
        let pool = self.get_pool(pool_id).await?;
        self.authorize(&pool, wallet)?;
        let updated = self.repriced(&pool, amount0, amount1).await?;

        let tx = Transaction::confirmed(
            TransactionType::Add,
            wallet.clone(),
            pool.token0_address.clone(),
            pool.token1_address.clone(),
            amount0,
            amount1,
        );
        self.commit(&pool, &updated, &tx).await?;

        info!(pool_id = %pool_id, wallet = %wallet, %amount0, %amount1, "Pool liquidity added");
        Ok(updated)
    }

    /// Withdraws `percent` of a pool's reserves and logs a `Remove`.
    ///
    /// # Errors
    /// `InvalidPercent` when the clamped percent is zero, plus the errors of
    /// [`Self::adjust_reserves`].
    pub async fn remove_pool_liquidity(
        &self,
        pool_id: PoolId,
        wallet: &Address,
        percent: Decimal,
    ) -> LedgerResult<Pool> {
        let percent = Percentage::clamped(percent);
        if percent.is_zero() {
            return Err(LedgerError::InvalidPercent(
                "percent must be greater than 0".into(),
            ));
        }

        let _guard = self.locks.lock(LockKey::Pool(pool_id)).await;
        let pool = self.get_pool(pool_id).await?;
        self.authorize(&pool, wallet)?;

        let remove0 = percent
            .of(pool.token0_reserve)
            .ok_or_else(LedgerError::overflow)?;
        let remove1 = percent
            .of(pool.token1_reserve)
            .ok_or_else(LedgerError::overflow)?;
        let updated = self.repriced(&pool, -remove0, -remove1).await?;

        let tx = Transaction::confirmed(
            TransactionType::Remove,
            wallet.clone(),
            pool.token0_address.clone(),
            pool.token1_address.clone(),
            remove0,
            remove1,
        );
        self.commit(&pool, &updated, &tx).await?;

        info!(pool_id = %pool_id, wallet = %wallet, percent = %percent.0, "Pool liquidity removed");
        Ok(updated)
    }

    /// Rejects `caller` unless the pool accepts liquidity from it.
    pub(crate) fn authorize(&self, pool: &Pool, caller: &Address) -> LedgerResult<()> {
        if pool.accepts_liquidity_from(caller) {
            return Ok(());
        }
        warn!(pool_id = %pool.id, caller = %caller, "Rejected non-creator liquidity change");
        Err(LedgerError::Unauthorized)
    }

    /// The pool after applying reserve deltas at current token prices.
    /// Nothing is written.
    pub(crate) async fn repriced(
        &self,
        pool: &Pool,
        delta0: Decimal,
        delta1: Decimal,
    ) -> LedgerResult<Pool> {
        let (token0, token1) = self
            .registry
            .resolve_pair(&pool.token0_address, &pool.token1_address)
            .await?;
        pool.with_reserve_delta(delta0, delta1, token0.price, token1.price)
            .ok_or_else(LedgerError::overflow)
    }

    async fn commit(&self, before: &Pool, after: &Pool, tx: &Transaction) -> LedgerResult<()> {
        let mut journal = RollbackJournal::new(self.store.as_ref());
        let outcome = async {
            journal.write_pool(before, after).await?;
            journal.append(tx).await
        }
        .await;
        journal.settle(outcome).await
    }
}
