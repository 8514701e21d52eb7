//! PostgreSQL repositories.
//!
//! Each repository owns one table. [`Database`] hands them out and implements
//! the store traits by delegating to them.

mod pool_repository;
mod position_repository;
mod stats_repository;
mod token_repository;
mod transaction_repository;

pub use pool_repository::PoolRepository;
pub use position_repository::PositionRepository;
pub use stats_repository::StatsRepository;
pub use token_repository::TokenRepository;
pub use transaction_repository::TransactionRepository;

use crate::error::{StoreError, StoreResult};
use crate::store::{
    PoolStore, PositionStore, StatsStore, TokenStore, TransactionFilter, TransactionStore,
};
use async_trait::async_trait;
use pioswap_domain::entities::{Pool, PoolId, Position, PositionId, ProtocolStats, Token, Transaction};
use pioswap_domain::value_objects::Address;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

/// Database connection wrapper for repositories.
#[derive(Clone)]
pub struct Database {
    pool: Arc<PgPool>,
}

impl Database {
    /// Creates a new Database wrapper from a connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Creates a new database connection from a connection string.
    ///
    /// # Arguments
    /// * `database_url` - PostgreSQL connection string
    ///
    /// # Errors
    /// Returns an error if the connection fails.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = PgPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    /// Returns a reference to the connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    #[must_use]
    pub fn tokens(&self) -> TokenRepository {
        TokenRepository::new(self.pool.clone())
    }

    #[must_use]
    pub fn pools(&self) -> PoolRepository {
        PoolRepository::new(self.pool.clone())
    }

    #[must_use]
    pub fn positions(&self) -> PositionRepository {
        PositionRepository::new(self.pool.clone())
    }

    #[must_use]
    pub fn transactions(&self) -> TransactionRepository {
        TransactionRepository::new(self.pool.clone())
    }

    #[must_use]
    pub fn stats(&self) -> StatsRepository {
        StatsRepository::new(self.pool.clone())
    }

    /// Runs database migrations.
    ///
    /// The schema file holds several statements, so it goes through the
    /// simple query protocol.
    ///
    /// # Errors
    /// Returns an error if migrations fail.
    pub async fn migrate(&self) -> Result<(), sqlx::Error> {
        sqlx::raw_sql(include_str!("../../migrations/001_initial_schema.sql"))
            .execute(self.pool.as_ref())
            .await?;
        Ok(())
    }
}

/// Reads a text column as a normalized address.
fn address_column(row: &PgRow, column: &str, table: &'static str) -> StoreResult<Address> {
    let raw: String = row.try_get(column)?;
    Address::parse(&raw).map_err(|e| StoreError::Corrupt {
        table,
        reason: format!("{column}: {e}"),
    })
}

/// Reads a nullable text column as an optional address.
fn optional_address_column(
    row: &PgRow,
    column: &str,
    table: &'static str,
) -> StoreResult<Option<Address>> {
    let raw: Option<String> = row.try_get(column)?;
    raw.map(|raw| {
        Address::parse(&raw).map_err(|e| StoreError::Corrupt {
            table,
            reason: format!("{column}: {e}"),
        })
    })
    .transpose()
}

/// Reads a BIGINT counter column.
fn counter_column(row: &PgRow, column: &str, table: &'static str) -> StoreResult<u64> {
    let raw: i64 = row.try_get(column)?;
    u64::try_from(raw).map_err(|_| StoreError::Corrupt {
        table,
        reason: format!("{column} is negative: {raw}"),
    })
}

/// Converts a page size to a SQL `LIMIT` value.
fn sql_limit(limit: usize) -> i64 {
    i64::try_from(limit).unwrap_or(i64::MAX)
}

#[async_trait]
impl TokenStore for Database {
    async fn find_token(&self, address: &Address) -> StoreResult<Option<Token>> {
        self.tokens().find_by_address(address).await
    }

    async fn list_tokens(&self, limit: usize) -> StoreResult<Vec<Token>> {
        self.tokens().find_all(limit).await
    }

    async fn insert_token(&self, token: &Token) -> StoreResult<bool> {
        self.tokens().insert(token).await
    }
}

#[async_trait]
impl PoolStore for Database {
    async fn find_pool(&self, id: PoolId) -> StoreResult<Option<Pool>> {
        self.pools().find_by_id(id).await
    }

    async fn find_pool_by_pair(
        &self,
        a: &Address,
        b: &Address,
        fee: Option<Decimal>,
    ) -> StoreResult<Option<Pool>> {
        self.pools().find_by_pair(a, b, fee).await
    }

    async fn upsert_pool(&self, pool: &Pool) -> StoreResult<()> {
        self.pools().upsert(pool).await
    }

    async fn list_pools(&self, limit: usize) -> StoreResult<Vec<Pool>> {
        self.pools().find_all(limit).await
    }

    async fn count_pools(&self) -> StoreResult<u64> {
        self.pools().count().await
    }
}

#[async_trait]
impl PositionStore for Database {
    async fn find_position(
        &self,
        wallet: &Address,
        pool_id: PoolId,
    ) -> StoreResult<Option<Position>> {
        self.positions().find_by_wallet_and_pool(wallet, pool_id).await
    }

    async fn find_position_by_id(&self, id: PositionId) -> StoreResult<Option<Position>> {
        self.positions().find_by_id(id).await
    }

    async fn list_positions(&self, wallet: &Address, limit: usize) -> StoreResult<Vec<Position>> {
        self.positions().find_by_wallet(wallet, limit).await
    }

    async fn upsert_position(&self, position: &Position) -> StoreResult<()> {
        self.positions().upsert(position).await
    }

    async fn delete_position(&self, id: PositionId) -> StoreResult<bool> {
        self.positions().delete(id).await
    }
}

#[async_trait]
impl TransactionStore for Database {
    async fn append_transaction(&self, tx: &Transaction) -> StoreResult<()> {
        self.transactions().insert(tx).await
    }

    async fn find_transactions(
        &self,
        filter: &TransactionFilter,
        limit: usize,
    ) -> StoreResult<Vec<Transaction>> {
        self.transactions().find(filter, limit).await
    }

    async fn find_transaction_by_hash(&self, tx_hash: &str) -> StoreResult<Option<Transaction>> {
        self.transactions().find_by_hash(tx_hash).await
    }
}

#[async_trait]
impl StatsStore for Database {
    async fn get_stats(&self) -> StoreResult<Option<ProtocolStats>> {
        self.stats().get().await
    }

    async fn replace_stats(&self, stats: &ProtocolStats) -> StoreResult<()> {
        self.stats().replace(stats).await
    }
}

#[cfg(test)]
mod tests {
    //! These run against a real PostgreSQL instance:
    //! `DATABASE_URL=postgres://.. cargo test -p pioswap-data -- --ignored`

    use super::*;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use pioswap_domain::enums::TransactionType;
    use pioswap_domain::value_objects::{Price, PriceRange};
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    static MIGRATIONS: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());

    async fn database() -> Database {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
        let db = Database::connect(&url).await.unwrap();
        let _guard = MIGRATIONS.lock().await;
        db.migrate().await.unwrap();
        db
    }

    /// PostgreSQL keeps microseconds; whole seconds round-trip exactly.
    fn low_precision_now() -> DateTime<Utc> {
        Utc.timestamp_opt(Utc::now().timestamp(), 0).unwrap()
    }

    /// An address unique to this test run.
    fn unique(label: &str) -> Address {
        Address::parse(&format!("0x{label}{}", Uuid::new_v4().simple())).unwrap()
    }

    async fn token(db: &Database, label: &str, price: Decimal) -> Token {
        let mut token = Token::new(unique(label), label.to_uppercase(), label, 18)
            .with_price(price)
            .with_logo("https://example.com/logo.png");
        token.created_at = low_precision_now();
        assert!(db.tokens().insert(&token).await.unwrap());
        token
    }

    fn pool_at(a: &Token, b: &Token, fee: Decimal, created_at: DateTime<Utc>) -> Pool {
        let mut pool = Pool::new(a.address.clone(), b.address.clone(), fee);
        pool.created_at = created_at;
        pool
    }

    fn entry(
        kind: TransactionType,
        wallet: &Address,
        token0: &Address,
        token1: &Address,
        at: DateTime<Utc>,
    ) -> Transaction {
        Transaction::confirmed(
            kind,
            wallet.clone(),
            token0.clone(),
            token1.clone(),
            dec!(1),
            dec!(2),
        )
        .at(at)
    }

    #[tokio::test]
    #[ignore]
    async fn postgres_token_round_trip() {
        let db = database().await;
        let pio = token(&db, "pio", dec!(2.45)).await;

        let found = db.tokens().find_by_address(&pio.address).await.unwrap();
        assert_eq!(found, Some(pio.clone()));
        assert!(!db.tokens().insert(&pio).await.unwrap());
        assert!(db.tokens().find_by_address(&unique("none")).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn postgres_pool_lookup_by_pair_and_fee() {
        let db = database().await;
        let a = token(&db, "a", dec!(1)).await;
        let b = token(&db, "b", dec!(2)).await;
        let created = low_precision_now();

        let mut low = pool_at(&a, &b, dec!(0.3), created);
        low.token0_reserve = dec!(100);
        low.token1_reserve = dec!(50);
        low.tvl = dec!(200);
        low.apr = dec!(30.0002);
        low.creator_address = Some(unique("creator"));
        db.pools().upsert(&low).await.unwrap();
        let high = pool_at(&a, &b, dec!(1), created + Duration::seconds(1));
        db.pools().upsert(&high).await.unwrap();

        let oldest = db.pools().find_by_pair(&b.address, &a.address, None).await.unwrap();
        assert_eq!(oldest, Some(low.clone()));
        let at_fee = db
            .pools()
            .find_by_pair(&a.address, &b.address, Some(dec!(1)))
            .await
            .unwrap();
        assert_eq!(at_fee, Some(high));
        let missing = db
            .pools()
            .find_by_pair(&a.address, &b.address, Some(dec!(0.05)))
            .await
            .unwrap();
        assert!(missing.is_none());

        let mut updated = low.clone();
        updated.volume_24h = dec!(245);
        updated.creator_address = None;
        db.pools().upsert(&updated).await.unwrap();
        let stored = db.pools().find_by_id(low.id).await.unwrap().unwrap();
        assert_eq!(stored.volume_24h, dec!(245));
        assert_eq!(stored.creator_address, low.creator_address);
    }

    #[tokio::test]
    #[ignore]
    async fn postgres_position_round_trip() {
        let db = database().await;
        let a = token(&db, "a", dec!(1)).await;
        let b = token(&db, "b", dec!(1)).await;
        let pool = pool_at(&a, &b, dec!(0.3), low_precision_now());
        db.pools().upsert(&pool).await.unwrap();

        let wallet = unique("wallet");
        let range = PriceRange::new(Price::new(dec!(0.5)), Some(Price::new(dec!(2))));
        let mut position = Position::open(pool.id, wallet.clone(), dec!(10), dec!(40), range);
        position.created_at = low_precision_now();
        position.updated_at = position.created_at;
        db.positions().upsert(&position).await.unwrap();

        let found = db
            .positions()
            .find_by_wallet_and_pool(&wallet, pool.id)
            .await
            .unwrap();
        assert_eq!(found, Some(position.clone()));
        assert_eq!(db.positions().find_by_wallet(&wallet, 10).await.unwrap().len(), 1);

        assert!(db.positions().delete(position.id).await.unwrap());
        assert!(!db.positions().delete(position.id).await.unwrap());
        assert!(db.positions().find_by_id(position.id).await.unwrap().is_none());
    }

    #[tokio::test]
    #[ignore]
    async fn postgres_transaction_filters() {
        let db = database().await;
        let a = unique("a");
        let b = unique("b");
        let c = unique("c");
        let alice = unique("alice");
        let bob = unique("bob");
        let start = low_precision_now();

        let entries = [
            entry(TransactionType::Swap, &alice, &a, &b, start)
                .with_tx_hash(Some(format!("0x{}", Uuid::new_v4().simple()))),
            entry(TransactionType::Add, &alice, &b, &a, start + Duration::seconds(1)),
            entry(TransactionType::Swap, &bob, &a, &c, start + Duration::seconds(2)),
        ];
        for tx in &entries {
            db.transactions().insert(tx).await.unwrap();
        }

        let by_alice = db
            .transactions()
            .find(&TransactionFilter::by_wallet(alice.clone()), 10)
            .await
            .unwrap();
        assert_eq!(by_alice, vec![entries[1].clone(), entries[0].clone()]);

        let pair = db
            .transactions()
            .find(&TransactionFilter::by_pair(b.clone(), a.clone()), 10)
            .await
            .unwrap();
        assert_eq!(pair.len(), 2);

        let pair_swaps = db
            .transactions()
            .find(
                &TransactionFilter::by_pair(a.clone(), b.clone()).of_kind(TransactionType::Swap),
                10,
            )
            .await
            .unwrap();
        assert_eq!(pair_swaps, vec![entries[0].clone()]);

        let recent = db
            .transactions()
            .find(
                &TransactionFilter::by_wallet(alice).since(start + Duration::seconds(1)),
                10,
            )
            .await
            .unwrap();
        assert_eq!(recent, vec![entries[1].clone()]);

        let hash = entries[0].tx_hash.as_deref().unwrap();
        let found = db.transactions().find_by_hash(hash).await.unwrap();
        assert_eq!(found, Some(entries[0].clone()));
    }

    #[tokio::test]
    #[ignore]
    async fn postgres_stats_singleton_is_replaced() {
        let db = database().await;
        let stats = ProtocolStats {
            total_volume: dec!(4641),
            tvl: dec!(490),
            total_swappers: 3,
            volume_24h: dec!(245),
            transactions_24h: 7,
            active_pools: 5,
            updated_at: Some(low_precision_now()),
        };
        db.stats().replace(&stats).await.unwrap();
        assert_eq!(db.stats().get().await.unwrap(), Some(stats.clone()));

        let next = ProtocolStats {
            transactions_24h: 8,
            ..stats
        };
        db.stats().replace(&next).await.unwrap();
        assert_eq!(db.stats().get().await.unwrap(), Some(next));
    }
}
