//! Liquidity position persistence.

use super::{address_column, sql_limit};
use crate::error::StoreResult;
use pioswap_domain::entities::{PoolId, Position, PositionId};
use pioswap_domain::value_objects::{Address, Price, PriceRange};
use rust_decimal::Decimal;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

const TABLE: &str = "positions";

fn position_from_row(row: &PgRow) -> StoreResult<Position> {
    let min_price: Decimal = row.try_get("min_price")?;
    let max_price: Option<Decimal> = row.try_get("max_price")?;

    Ok(Position {
        id: PositionId(row.try_get("id")?),
        pool_id: PoolId(row.try_get("pool_id")?),
        wallet_address: address_column(row, "wallet_address", TABLE)?,
        token0_amount: row.try_get("token0_amount")?,
        token1_amount: row.try_get("token1_amount")?,
        liquidity: row.try_get("liquidity")?,
        range: PriceRange::new(Price::new(min_price), max_price.map(Price::new)),
        unclaimed_fees: row.try_get("unclaimed_fees")?,
        in_range: row.try_get("in_range")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Repository for liquidity positions.
#[derive(Clone)]
pub struct PositionRepository {
    pool: Arc<PgPool>,
}

impl PositionRepository {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds a position by ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_id(&self, id: PositionId) -> StoreResult<Option<Position>> {
        let row = sqlx::query("SELECT * FROM positions WHERE id = $1")
            .bind(id.0)
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(position_from_row).transpose()
    }

    /// Finds the position a wallet holds in a pool.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_wallet_and_pool(
        &self,
        wallet: &Address,
        pool_id: PoolId,
    ) -> StoreResult<Option<Position>> {
        let row = sqlx::query("SELECT * FROM positions WHERE wallet_address = $1 AND pool_id = $2")
            .bind(wallet.as_str())
            .bind(pool_id.0)
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(position_from_row).transpose()
    }

    /// Lists a wallet's positions, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_wallet(&self, wallet: &Address, limit: usize) -> StoreResult<Vec<Position>> {
        let rows = sqlx::query(
            "SELECT * FROM positions WHERE wallet_address = $1 ORDER BY created_at DESC LIMIT $2",
        )
        .bind(wallet.as_str())
        .bind(sql_limit(limit))
        .fetch_all(self.pool.as_ref())
        .await?;
        rows.iter().map(position_from_row).collect()
    }

    /// Creates or updates a position.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn upsert(&self, position: &Position) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO positions (id, pool_id, wallet_address, token0_amount, token1_amount,
                                   liquidity, min_price, max_price, unclaimed_fees, in_range,
                                   created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                token0_amount = EXCLUDED.token0_amount,
                token1_amount = EXCLUDED.token1_amount,
                liquidity = EXCLUDED.liquidity,
                min_price = EXCLUDED.min_price,
                max_price = EXCLUDED.max_price,
                unclaimed_fees = EXCLUDED.unclaimed_fees,
                in_range = EXCLUDED.in_range,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(position.id.0)
        .bind(position.pool_id.0)
        .bind(position.wallet_address.as_str())
        .bind(position.token0_amount)
        .bind(position.token1_amount)
        .bind(position.liquidity)
        .bind(position.range.lower_price.value)
        .bind(position.range.upper_price.map(|p| p.value))
        .bind(position.unclaimed_fees)
        .bind(position.in_range)
        .bind(position.created_at)
        .bind(position.updated_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    /// Deletes a position by ID.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn delete(&self, id: PositionId) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM positions WHERE id = $1")
            .bind(id.0)
            .execute(self.pool.as_ref())
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
