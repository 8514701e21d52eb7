//! Storage contracts consumed by the ledger.
//!
//! Every address crossing this boundary is already case-normalized
//! ([`Address`] guarantees it), so implementations may match keys exactly.

use crate::error::StoreResult;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pioswap_domain::entities::{Pool, PoolId, Position, PositionId, ProtocolStats, Token, Transaction};
use pioswap_domain::enums::TransactionType;
use pioswap_domain::value_objects::Address;
use rust_decimal::Decimal;

/// Token registry lookups.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Finds a token by its address.
    async fn find_token(&self, address: &Address) -> StoreResult<Option<Token>>;

    /// Lists up to `limit` tokens in registration order.
    async fn list_tokens(&self, limit: usize) -> StoreResult<Vec<Token>>;

    /// Inserts a token; returns `false` if the address is already taken.
    async fn insert_token(&self, token: &Token) -> StoreResult<bool>;
}

/// Pool records.
#[async_trait]
pub trait PoolStore: Send + Sync {
    /// Finds a pool by ID.
    async fn find_pool(&self, id: PoolId) -> StoreResult<Option<Pool>>;

    /// Finds the pool for an unordered pair, optionally restricted to a fee
    /// tier. Without a fee the oldest pool of the pair is returned.
    async fn find_pool_by_pair(
        &self,
        a: &Address,
        b: &Address,
        fee: Option<Decimal>,
    ) -> StoreResult<Option<Pool>>;

    /// Creates or replaces a pool record.
    async fn upsert_pool(&self, pool: &Pool) -> StoreResult<()>;

    /// Lists up to `limit` pools in creation order.
    async fn list_pools(&self, limit: usize) -> StoreResult<Vec<Pool>>;

    /// Counts all pools.
    async fn count_pools(&self) -> StoreResult<u64>;
}

/// Liquidity positions.
#[async_trait]
pub trait PositionStore: Send + Sync {
    /// Finds the position a wallet holds in a pool.
    async fn find_position(&self, wallet: &Address, pool_id: PoolId)
    -> StoreResult<Option<Position>>;

    /// Finds a position by ID.
    async fn find_position_by_id(&self, id: PositionId) -> StoreResult<Option<Position>>;

    /// Lists a wallet's positions, newest first.
    async fn list_positions(&self, wallet: &Address, limit: usize) -> StoreResult<Vec<Position>>;

    /// Creates or replaces a position record.
    async fn upsert_position(&self, position: &Position) -> StoreResult<()>;

    /// Deletes a position; returns whether it existed.
    async fn delete_position(&self, id: PositionId) -> StoreResult<bool>;
}

/// Selection applied to the transaction log.
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Only entries written by this wallet.
    pub wallet: Option<Address>,
    /// Only entries for this unordered pair.
    pub pair: Option<(Address, Address)>,
    /// Only entries of this kind.
    pub kind: Option<TransactionType>,
    /// Only entries at or after this instant.
    pub since: Option<DateTime<Utc>>,
}

impl TransactionFilter {
    /// Matches every entry.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn by_wallet(wallet: Address) -> Self {
        Self {
            wallet: Some(wallet),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn by_pair(a: Address, b: Address) -> Self {
        Self {
            pair: Some((a, b)),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn of_kind(mut self, kind: TransactionType) -> Self {
        self.kind = Some(kind);
        self
    }

    #[must_use]
    pub fn since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    /// Whether `tx` satisfies every set criterion.
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.wallet.as_ref().is_none_or(|w| &tx.wallet_address == w)
            && self.pair.as_ref().is_none_or(|(a, b)| tx.involves_pair(a, b))
            && self.kind.is_none_or(|k| tx.kind == k)
            && self.since.is_none_or(|since| tx.timestamp >= since)
    }
}

/// The append-only transaction log.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Appends an entry. Must be durable when this returns.
    async fn append_transaction(&self, tx: &Transaction) -> StoreResult<()>;

    /// Entries matching `filter`, newest first, at most `limit`.
    async fn find_transactions(
        &self,
        filter: &TransactionFilter,
        limit: usize,
    ) -> StoreResult<Vec<Transaction>>;

    /// Finds an entry by its external transaction hash.
    async fn find_transaction_by_hash(&self, tx_hash: &str) -> StoreResult<Option<Transaction>>;
}

/// The protocol statistics singleton.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// Returns the stored singleton, if any.
    async fn get_stats(&self) -> StoreResult<Option<ProtocolStats>>;

    /// Overwrites the singleton.
    async fn replace_stats(&self, stats: &ProtocolStats) -> StoreResult<()>;
}

/// Everything the ledger needs from storage.
pub trait LedgerStore:
    TokenStore + PoolStore + PositionStore + TransactionStore + StatsStore
{
}

impl<T> LedgerStore for T where
    T: TokenStore + PoolStore + PositionStore + TransactionStore + StatsStore
{
}
