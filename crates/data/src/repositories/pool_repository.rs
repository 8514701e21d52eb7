//! Pool persistence.

use super::{address_column, optional_address_column, sql_limit};
use crate::error::{StoreError, StoreResult};
use pioswap_domain::entities::{Pool, PoolId};
use pioswap_domain::value_objects::Address;
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

const TABLE: &str = "pools";

fn pool_from_row(row: &PgRow) -> StoreResult<Pool> {
    Ok(Pool {
        id: PoolId(row.try_get("id")?),
        token0_address: address_column(row, "token0_address", TABLE)?,
        token1_address: address_column(row, "token1_address", TABLE)?,
        fee: row.try_get("fee")?,
        token0_reserve: row.try_get("token0_reserve")?,
        token1_reserve: row.try_get("token1_reserve")?,
        tvl: row.try_get("tvl")?,
        volume_24h: row.try_get("volume_24h")?,
        apr: row.try_get("apr")?,
        creator_address: optional_address_column(row, "creator_address", TABLE)?,
        pair_address: optional_address_column(row, "pair_address", TABLE)?,
        created_at: row.try_get("created_at")?,
    })
}

/// Repository for pool CRUD operations.
#[derive(Clone)]
pub struct PoolRepository {
    pool: Arc<PgPool>,
}

impl PoolRepository {
    /// Creates a new PoolRepository.
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds a pool by its ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: PoolId) -> StoreResult<Option<Pool>> {
        let row = sqlx::query("SELECT * FROM pools WHERE id = $1")
            .bind(id.0)
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(pool_from_row).transpose()
    }

    /// Finds the pool trading an unordered pair, optionally at a given fee.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_pair(
        &self,
        a: &Address,
        b: &Address,
        fee: Option<Decimal>,
    ) -> StoreResult<Option<Pool>> {
        let row = sqlx::query(
            r#"
            SELECT * FROM pools
            WHERE ((token0_address = $1 AND token1_address = $2)
                OR (token0_address = $2 AND token1_address = $1))
              AND ($3::NUMERIC IS NULL OR fee = $3)
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(a.as_str())
        .bind(b.as_str())
        .bind(fee)
        .fetch_optional(self.pool.as_ref())
        .await?;
        row.as_ref().map(pool_from_row).transpose()
    }

    /// Lists pools in creation order.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_all(&self, limit: usize) -> StoreResult<Vec<Pool>> {
        let rows = sqlx::query("SELECT * FROM pools ORDER BY created_at ASC LIMIT $1")
            .bind(sql_limit(limit))
            .fetch_all(self.pool.as_ref())
            .await?;
        rows.iter().map(pool_from_row).collect()
    }

    /// Counts all pools.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn count(&self) -> StoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM pools")
            .fetch_one(self.pool.as_ref())
            .await?;
        u64::try_from(count).map_err(|_| StoreError::Corrupt {
            table: TABLE,
            reason: format!("negative count: {count}"),
        })
    }

    /// Creates or updates a pool record.
    ///
    /// Identity columns (tokens, fee, creator, pair) are written once; an
    /// update only touches the mutable figures.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn upsert(&self, pool: &Pool) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO pools (id, token0_address, token1_address, fee, token0_reserve,
                               token1_reserve, tvl, volume_24h, apr, creator_address,
                               pair_address, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                token0_reserve = EXCLUDED.token0_reserve,
                token1_reserve = EXCLUDED.token1_reserve,
                tvl = EXCLUDED.tvl,
                volume_24h = EXCLUDED.volume_24h,
                apr = EXCLUDED.apr
            "#,
        )
        .bind(pool.id.0)
        .bind(pool.token0_address.as_str())
        .bind(pool.token1_address.as_str())
        .bind(pool.fee)
        .bind(pool.token0_reserve)
        .bind(pool.token1_reserve)
        .bind(pool.tvl)
        .bind(pool.volume_24h)
        .bind(pool.apr)
        .bind(pool.creator_address.as_ref().map(Address::as_str))
        .bind(pool.pair_address.as_ref().map(Address::as_str))
        .bind(pool.created_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }
}
