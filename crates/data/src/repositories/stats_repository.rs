//! The protocol statistics singleton row.

use super::counter_column;
use crate::error::{StoreError, StoreResult};
use pioswap_domain::entities::ProtocolStats;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

const TABLE: &str = "protocol_stats";

fn stats_from_row(row: &PgRow) -> StoreResult<ProtocolStats> {
    Ok(ProtocolStats {
        total_volume: row.try_get("total_volume")?,
        tvl: row.try_get("tvl")?,
        total_swappers: counter_column(row, "total_swappers", TABLE)?,
        volume_24h: row.try_get("volume_24h")?,
        transactions_24h: counter_column(row, "transactions_24h", TABLE)?,
        active_pools: counter_column(row, "active_pools", TABLE)?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn counter_param(value: u64, column: &str) -> StoreResult<i64> {
    i64::try_from(value).map_err(|_| StoreError::Corrupt {
        table: TABLE,
        reason: format!("{column} exceeds BIGINT: {value}"),
    })
}

/// Repository for the stats singleton (always row `id = 1`).
#[derive(Clone)]
pub struct StatsRepository {
    pool: Arc<PgPool>,
}

impl StatsRepository {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Returns the stored stats, if any.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn get(&self) -> StoreResult<Option<ProtocolStats>> {
        let row = sqlx::query("SELECT * FROM protocol_stats WHERE id = 1")
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(stats_from_row).transpose()
    }

    /// Overwrites the singleton.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn replace(&self, stats: &ProtocolStats) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO protocol_stats (id, total_volume, tvl, total_swappers, volume_24h,
                                        transactions_24h, active_pools, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO UPDATE SET
                total_volume = EXCLUDED.total_volume,
                tvl = EXCLUDED.tvl,
                total_swappers = EXCLUDED.total_swappers,
                volume_24h = EXCLUDED.volume_24h,
                transactions_24h = EXCLUDED.transactions_24h,
                active_pools = EXCLUDED.active_pools,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(stats.total_volume)
        .bind(stats.tvl)
        .bind(counter_param(stats.total_swappers, "total_swappers")?)
        .bind(stats.volume_24h)
        .bind(counter_param(stats.transactions_24h, "transactions_24h")?)
        .bind(counter_param(stats.active_pools, "active_pools")?)
        .bind(stats.updated_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }
}
