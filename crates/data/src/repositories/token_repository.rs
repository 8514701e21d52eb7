//! Token registry persistence.

use super::{address_column, sql_limit};
use crate::error::{StoreError, StoreResult};
use pioswap_domain::entities::Token;
use pioswap_domain::value_objects::Address;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::sync::Arc;

const TABLE: &str = "tokens";

fn token_from_row(row: &PgRow) -> StoreResult<Token> {
    let decimals: i16 = row.try_get("decimals")?;
    let decimals = u8::try_from(decimals).map_err(|_| StoreError::Corrupt {
        table: TABLE,
        reason: format!("decimals out of range: {decimals}"),
    })?;

    Ok(Token {
        address: address_column(row, "address", TABLE)?,
        symbol: row.try_get("symbol")?,
        name: row.try_get("name")?,
        decimals,
        logo: row.try_get("logo")?,
        is_native: row.try_get("is_native")?,
        price: row.try_get("price")?,
        price_change_24h: row.try_get("price_change_24h")?,
        created_at: row.try_get("created_at")?,
    })
}

/// Repository for registered tokens.
#[derive(Clone)]
pub struct TokenRepository {
    pool: Arc<PgPool>,
}

impl TokenRepository {
    #[must_use]
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Finds a token by its (normalized) address.
    ///
    /// # Errors
    /// Returns an error if the query fails or the row is malformed.
    pub async fn find_by_address(&self, address: &Address) -> StoreResult<Option<Token>> {
        let row = sqlx::query("SELECT * FROM tokens WHERE address = $1")
            .bind(address.as_str())
            .fetch_optional(self.pool.as_ref())
            .await?;
        row.as_ref().map(token_from_row).transpose()
    }

    /// Lists tokens in registration order.
    ///
    /// # Errors
    /// Returns an error if the query fails or a row is malformed.
    pub async fn find_all(&self, limit: usize) -> StoreResult<Vec<Token>> {
        let rows = sqlx::query("SELECT * FROM tokens ORDER BY created_at ASC LIMIT $1")
            .bind(sql_limit(limit))
            .fetch_all(self.pool.as_ref())
            .await?;
        rows.iter().map(token_from_row).collect()
    }

    /// Inserts a token unless the address is already registered.
    ///
    /// Returns `true` when a row was written.
    ///
    /// # Errors
    /// Returns an error if the query fails.
    pub async fn insert(&self, token: &Token) -> StoreResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO tokens (address, symbol, name, decimals, logo, is_native,
                                price, price_change_24h, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (address) DO NOTHING
            "#,
        )
        .bind(token.address.as_str())
        .bind(&token.symbol)
        .bind(&token.name)
        .bind(i16::from(token.decimals))
        .bind(token.logo.as_deref())
        .bind(token.is_native)
        .bind(token.price)
        .bind(token.price_change_24h)
        .bind(token.created_at)
        .execute(self.pool.as_ref())
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
