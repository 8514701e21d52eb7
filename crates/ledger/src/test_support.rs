//! Fixtures shared by the ledger tests.

use async_trait::async_trait;
use pioswap_data::{
    LedgerStore, MemoryStore, PoolStore, PositionStore, StatsStore, StoreError, StoreResult,
    TokenStore, TransactionFilter, TransactionStore,
};
use pioswap_domain::entities::{Pool, PoolId, Position, PositionId, ProtocolStats, Token, Transaction};
use pioswap_domain::value_objects::Address;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

pub const PIO: &str = "0x0000000000000000000000000000000000000000";
pub const USDT: &str = "0x2222222222222222222222222222222222222222";
pub const USDC: &str = "0x3333333333333333333333333333333333333333";
pub const PETH: &str = "0x5555555555555555555555555555555555555555";
/// Registered with a zero price.
pub const UNPRICED: &str = "0x9999999999999999999999999999999999999999";

pub fn addr(raw: &str) -> Address {
    Address::parse(raw).unwrap()
}

pub async fn seed_tokens(store: &dyn LedgerStore) {
    let tokens = [
        Token::new(addr(PIO), "PIO", "PIOGOLD", 18).with_price(dec!(2.45)).native(),
        Token::new(addr(USDT), "USDT", "Tether USD", 6).with_price(dec!(1.00)),
        Token::new(addr(USDC), "USDC", "USD Coin", 6).with_price(dec!(1.00)),
        Token::new(addr(PETH), "PETH", "Pio Ethereum", 18).with_price(dec!(2320.50)),
        Token::new(addr(UNPRICED), "NOPE", "Unpriced", 18),
    ];
    for token in &tokens {
        assert!(store.insert_token(token).await.unwrap());
    }
}

/// A memory store with the fixture tokens registered.
pub async fn seeded_store() -> Arc<dyn LedgerStore> {
    let store = MemoryStore::new();
    seed_tokens(&store).await;
    Arc::new(store)
}

/// A memory store whose log appends can be made to fail.
#[derive(Clone, Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_appends: Arc<AtomicBool>,
}

impl FlakyStore {
    pub async fn seeded() -> Self {
        let store = Self::default();
        seed_tokens(&store).await;
        store
    }

    pub fn fail_appends(&self, fail: bool) {
        self.fail_appends.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl TokenStore for FlakyStore {
    async fn find_token(&self, address: &Address) -> StoreResult<Option<Token>> {
        self.inner.find_token(address).await
    }

    async fn list_tokens(&self, limit: usize) -> StoreResult<Vec<Token>> {
        self.inner.list_tokens(limit).await
    }

    async fn insert_token(&self, token: &Token) -> StoreResult<bool> {
        self.inner.insert_token(token).await
    }
}

#[async_trait]
impl PoolStore for FlakyStore {
    async fn find_pool(&self, id: PoolId) -> StoreResult<Option<Pool>> {
        self.inner.find_pool(id).await
    }

    async fn find_pool_by_pair(
        &self,
        a: &Address,
        b: &Address,
        fee: Option<Decimal>,
    ) -> StoreResult<Option<Pool>> {
        self.inner.find_pool_by_pair(a, b, fee).await
    }

    async fn upsert_pool(&self, pool: &Pool) -> StoreResult<()> {
        self.inner.upsert_pool(pool).await
    }

    async fn list_pools(&self, limit: usize) -> StoreResult<Vec<Pool>> {
        self.inner.list_pools(limit).await
    }

    async fn count_pools(&self) -> StoreResult<u64> {
        self.inner.count_pools().await
    }
}

#[async_trait]
impl PositionStore for FlakyStore {
    async fn find_position(
        &self,
        wallet: &Address,
        pool_id: PoolId,
    ) -> StoreResult<Option<Position>> {
        self.inner.find_position(wallet, pool_id).await
    }

    async fn find_position_by_id(&self, id: PositionId) -> StoreResult<Option<Position>> {
        self.inner.find_position_by_id(id).await
    }

    async fn list_positions(&self, wallet: &Address, limit: usize) -> StoreResult<Vec<Position>> {
        self.inner.list_positions(wallet, limit).await
    }

    async fn upsert_position(&self, position: &Position) -> StoreResult<()> {
        self.inner.upsert_position(position).await
    }

    async fn delete_position(&self, id: PositionId) -> StoreResult<bool> {
        self.inner.delete_position(id).await
    }
}

#[async_trait]
impl TransactionStore for FlakyStore {
    async fn append_transaction(&self, tx: &Transaction) -> StoreResult<()> {
        if self.fail_appends.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("log append refused".into()));
        }
        self.inner.append_transaction(tx).await
    }

    async fn find_transactions(
        &self,
        filter: &TransactionFilter,
        limit: usize,
    ) -> StoreResult<Vec<Transaction>> {
        self.inner.find_transactions(filter, limit).await
    }

    async fn find_transaction_by_hash(&self, tx_hash: &str) -> StoreResult<Option<Transaction>> {
        self.inner.find_transaction_by_hash(tx_hash).await
    }
}

#[async_trait]
impl StatsStore for FlakyStore {
    async fn get_stats(&self) -> StoreResult<Option<ProtocolStats>> {
        self.inner.get_stats().await
    }

    async fn replace_stats(&self, stats: &ProtocolStats) -> StoreResult<()> {
        self.inner.replace_stats(stats).await
    }
}
