//! Transaction log persistence. Rows are only ever inserted.

use super::{address_column, sql_limit};
use crate::error::{StoreError, StoreResult};
use crate::store::TransactionFilter;
use pioswap_domain::entities::Transaction;
use pioswap_domain::enums::{TransactionStatus, TransactionType};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use std::sync::Arc;

const TABLE: &str = "transactions";

fn transaction_from_row(row: &PgRow) -> StoreResult<Transaction> {
    let kind: String = row.try_get("kind")?;
    let status: String = row.try_get("status")?;
    let corrupt = |e: pioswap_domain::enums::UnknownVariant| StoreError::Corrupt {
        table: TABLE,
        reason: e.to_string(),
    };

    Ok(Transaction {
        id: row.try_get("id")?,
        kind: kind.parse::<TransactionType>().map_err(corrupt)?,
        wallet_address: address_column(row, "wallet_address", TABLE)?,
        token0_address: address_column(row, "token0_address", TABLE)?,
        token1_address: address_column(row, "token1_address", TABLE)?,
        amount0: row.try_get("amount0")?,
        amount1: row.try_get("amount1")?,
        tx_hash: row.try_get("tx_hash")?,
        status: status.parse::<TransactionStatus>().map_err(corrupt)?,
        timestamp: row.try_get("timestamp")?,
    })
}

/// Repository for the append-only transaction log.
#[derive(Clone)]
pub struct TransactionRepository {
    pool: Arc<PgPool>,
}

impl TransactionRepository {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Appends an entry.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub async fn insert(&self, tx: &Transaction) -> StoreResult<()> {
        sqlx::query(
            r#"
            INSERT INTO transactions (id, kind, wallet_address, token0_address, token1_address,
                                      amount0, amount1, tx_hash, status, timestamp)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(tx.id)
        .bind(tx.kind.as_str())
        .bind(tx.wallet_address.as_str())
        .bind(tx.token0_address.as_str())
        .bind(tx.token1_address.as_str())
        .bind(tx.amount0)
        .bind(tx.amount1)
        .bind(tx.tx_hash.as_deref())
        .bind(tx.status.as_str())
        .bind(tx.timestamp)
        .execute(self.pool.as_ref())
        .await?;
        Ok(())
    }

    /// Entries matching `filter`, newest first.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find(
        &self,
        filter: &TransactionFilter,
        limit: usize,
    ) -> StoreResult<Vec<Transaction>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM transactions WHERE TRUE");

        if let Some(wallet) = &filter.wallet {
            query
                .push(" AND wallet_address = ")
                .push_bind(wallet.as_str().to_owned());
        }
        if let Some((a, b)) = &filter.pair {
            query
                .push(" AND ((token0_address = ")
                .push_bind(a.as_str().to_owned())
                .push(" AND token1_address = ")
                .push_bind(b.as_str().to_owned())
                .push(") OR (token0_address = ")
                .push_bind(b.as_str().to_owned())
                .push(" AND token1_address = ")
                .push_bind(a.as_str().to_owned())
                .push("))");
        }
        if let Some(kind) = filter.kind {
            query.push(" AND kind = ").push_bind(kind.as_str());
        }
        if let Some(since) = filter.since {
            query.push(" AND timestamp >= ").push_bind(since);
        }
        query
            .push(" ORDER BY timestamp DESC LIMIT ")
            .push_bind(sql_limit(limit));

        let rows = query.build().fetch_all(self.pool.as_ref()).await?;
        rows.iter().map(transaction_from_row).collect()
    }

    /// Finds an entry by its external hash.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn find_by_hash(&self, tx_hash: &str) -> StoreResult<Option<Transaction>> {
        let row = sqlx::query(
            "SELECT * FROM transactions WHERE tx_hash = $1 ORDER BY timestamp ASC LIMIT 1",
        )
        .bind(tx_hash)
        .fetch_optional(self.pool.as_ref())
        .await?;
        row.as_ref().map(transaction_from_row).transpose()
    }
}
