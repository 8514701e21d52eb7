//! In-process store backed by tokio locks.
//!
//! Used by tests and by the demo server when no database is configured.
//! Each collection sits behind its own `RwLock`, so a single call is atomic
//! with respect to that collection. Collections keep insertion order, which
//! breaks ties between records created in the same instant.

use crate::error::StoreResult;
use crate::store::{
    PoolStore, PositionStore, StatsStore, TokenStore, TransactionFilter, TransactionStore,
};
use async_trait::async_trait;
use pioswap_domain::entities::{Pool, PoolId, Position, PositionId, ProtocolStats, Token, Transaction};
use pioswap_domain::value_objects::Address;
use rust_decimal::Decimal;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Store that keeps every record in memory.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tokens: Arc<RwLock<Vec<Token>>>,
    pools: Arc<RwLock<Vec<Pool>>>,
    positions: Arc<RwLock<Vec<Position>>>,
    transactions: Arc<RwLock<Vec<Transaction>>>,
    stats: Arc<RwLock<Option<ProtocolStats>>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn find_token(&self, address: &Address) -> StoreResult<Option<Token>> {
        Ok(self
            .tokens
            .read()
            .await
            .iter()
            .find(|t| &t.address == address)
            .cloned())
    }

    async fn list_tokens(&self, limit: usize) -> StoreResult<Vec<Token>> {
        Ok(self.tokens.read().await.iter().take(limit).cloned().collect())
    }

    async fn insert_token(&self, token: &Token) -> StoreResult<bool> {
        let mut tokens = self.tokens.write().await;
        if tokens.iter().any(|t| t.address == token.address) {
            return Ok(false);
        }
        tokens.push(token.clone());
        Ok(true)
    }
}

#[async_trait]
impl PoolStore for MemoryStore {
    async fn find_pool(&self, id: PoolId) -> StoreResult<Option<Pool>> {
        Ok(self.pools.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_pool_by_pair(
        &self,
        a: &Address,
        b: &Address,
        fee: Option<Decimal>,
    ) -> StoreResult<Option<Pool>> {
        Ok(self
            .pools
            .read()
            .await
            .iter()
            .filter(|p| p.matches_pair(a, b))
            .filter(|p| fee.is_none_or(|fee| p.fee == fee))
            .min_by_key(|p| p.created_at)
            .cloned())
    }

    async fn upsert_pool(&self, pool: &Pool) -> StoreResult<()> {
        let mut pools = self.pools.write().await;
        match pools.iter_mut().find(|p| p.id == pool.id) {
            Some(existing) => *existing = pool.clone(),
            None => pools.push(pool.clone()),
        }
        Ok(())
    }

    async fn list_pools(&self, limit: usize) -> StoreResult<Vec<Pool>> {
        let mut all = self.pools.read().await.clone();
        all.sort_by_key(|p| p.created_at);
        all.truncate(limit);
        Ok(all)
    }

    async fn count_pools(&self) -> StoreResult<u64> {
        Ok(self.pools.read().await.len() as u64)
    }
}

#[async_trait]
impl PositionStore for MemoryStore {
    async fn find_position(
        &self,
        wallet: &Address,
        pool_id: PoolId,
    ) -> StoreResult<Option<Position>> {
        Ok(self
            .positions
            .read()
            .await
            .iter()
            .find(|p| &p.wallet_address == wallet && p.pool_id == pool_id)
            .cloned())
    }

    async fn find_position_by_id(&self, id: PositionId) -> StoreResult<Option<Position>> {
        Ok(self
            .positions
            .read()
            .await
            .iter()
            .find(|p| p.id == id)
            .cloned())
    }

    async fn list_positions(&self, wallet: &Address, limit: usize) -> StoreResult<Vec<Position>> {
        let positions = self.positions.read().await;
        let mut owned: Vec<Position> = positions
            .iter()
            .rev()
            .filter(|p| &p.wallet_address == wallet)
            .cloned()
            .collect();
        owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        owned.truncate(limit);
        Ok(owned)
    }

    async fn upsert_position(&self, position: &Position) -> StoreResult<()> {
        let mut positions = self.positions.write().await;
        match positions.iter_mut().find(|p| p.id == position.id) {
            Some(existing) => *existing = position.clone(),
            None => positions.push(position.clone()),
        }
        Ok(())
    }

    async fn delete_position(&self, id: PositionId) -> StoreResult<bool> {
        let mut positions = self.positions.write().await;
        let before = positions.len();
        positions.retain(|p| p.id != id);
        Ok(positions.len() < before)
    }
}

#[async_trait]
impl TransactionStore for MemoryStore {
    async fn append_transaction(&self, tx: &Transaction) -> StoreResult<()> {
        self.transactions.write().await.push(tx.clone());
        Ok(())
    }

    async fn find_transactions(
        &self,
        filter: &TransactionFilter,
        limit: usize,
    ) -> StoreResult<Vec<Transaction>> {
        let log = self.transactions.read().await;
        let mut matching: Vec<Transaction> = log
            .iter()
            .rev()
            .filter(|tx| filter.matches(tx))
            .cloned()
            .collect();
        // stable: equal timestamps stay latest-appended first
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(limit);
        Ok(matching)
    }

    async fn find_transaction_by_hash(&self, tx_hash: &str) -> StoreResult<Option<Transaction>> {
        Ok(self
            .transactions
            .read()
            .await
            .iter()
            .find(|tx| tx.tx_hash.as_deref() == Some(tx_hash))
            .cloned())
    }
}

#[async_trait]
impl StatsStore for MemoryStore {
    async fn get_stats(&self) -> StoreResult<Option<ProtocolStats>> {
        Ok(self.stats.read().await.clone())
    }

    async fn replace_stats(&self, stats: &ProtocolStats) -> StoreResult<()> {
        *self.stats.write().await = Some(stats.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use pioswap_domain::enums::TransactionType;
    use rust_decimal_macros::dec;

    fn addr(s: &str) -> Address {
        Address::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_token_insert_is_unique() {
        let store = MemoryStore::new();
        let token = Token::new(addr("0xAA"), "AAA", "Token A", 18);
        assert!(store.insert_token(&token).await.unwrap());
        assert!(!store.insert_token(&token).await.unwrap());
        assert!(store.find_token(&addr("0xaa")).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_pool_pair_lookup_checks_both_orders_and_fee() {
        let store = MemoryStore::new();
        let pool = Pool::new(addr("0xaa"), addr("0xbb"), dec!(0.3));
        store.upsert_pool(&pool).await.unwrap();

        let found = store
            .find_pool_by_pair(&addr("0xbb"), &addr("0xaa"), Some(dec!(0.30)))
            .await
            .unwrap();
        assert_eq!(found.map(|p| p.id), Some(pool.id));

        let other_fee = store
            .find_pool_by_pair(&addr("0xaa"), &addr("0xbb"), Some(dec!(1)))
            .await
            .unwrap();
        assert!(other_fee.is_none());

        let any_fee = store
            .find_pool_by_pair(&addr("0xaa"), &addr("0xbb"), None)
            .await
            .unwrap();
        assert!(any_fee.is_some());
    }

    #[tokio::test]
    async fn test_transactions_newest_first_with_limit() {
        let store = MemoryStore::new();
        let now = Utc::now();
        for i in 0..5 {
            let tx = Transaction::confirmed(
                TransactionType::Swap,
                addr("0xw"),
                addr("0xaa"),
                addr("0xbb"),
                Decimal::from(i),
                Decimal::ONE,
            )
            .at(now - Duration::minutes(10 - i));
            store.append_transaction(&tx).await.unwrap();
        }

        let recent = store
            .find_transactions(&TransactionFilter::all(), 3)
            .await
            .unwrap();
        let amounts: Vec<Decimal> = recent.iter().map(|t| t.amount0).collect();
        assert_eq!(amounts, vec![dec!(4), dec!(3), dec!(2)]);
    }

    #[tokio::test]
    async fn test_transaction_filter_by_pair_and_kind() {
        let store = MemoryStore::new();
        let swap = Transaction::confirmed(
            TransactionType::Swap,
            addr("0xw"),
            addr("0xbb"),
            addr("0xaa"),
            dec!(1),
            dec!(2),
        );
        let add = Transaction::confirmed(
            TransactionType::Add,
            addr("0xw"),
            addr("0xaa"),
            addr("0xbb"),
            dec!(1),
            dec!(2),
        );
        store.append_transaction(&swap).await.unwrap();
        store.append_transaction(&add).await.unwrap();

        let filter =
            TransactionFilter::by_pair(addr("0xaa"), addr("0xbb")).of_kind(TransactionType::Swap);
        let found = store.find_transactions(&filter, 10).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, swap.id);
    }

    #[tokio::test]
    async fn test_position_delete() {
        let store = MemoryStore::new();
        let position = Position::open(
            PoolId::generate(),
            addr("0xw"),
            dec!(1),
            dec!(1),
            Default::default(),
        );
        store.upsert_position(&position).await.unwrap();
        assert!(store.delete_position(position.id).await.unwrap());
        assert!(!store.delete_position(position.id).await.unwrap());
    }
}
