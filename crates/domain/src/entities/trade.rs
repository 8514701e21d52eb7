use crate::value_objects::{Address, price::Price};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A swap re-expressed in a requested (token0, token1) orientation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trade {
    /// ID of the underlying log entry.
    pub id: Uuid,
    /// Swapping wallet.
    pub wallet_address: Address,
    /// Amount of the requested `token0`.
    pub token0_amount: Decimal,
    /// Amount of the requested `token1`.
    pub token1_amount: Decimal,
    /// `token1_amount / token0_amount`.
    pub price: Price,
    /// Chain transaction hash.
    pub tx_hash: Option<String>,
    /// When the swap was recorded.
    pub timestamp: DateTime<Utc>,
}
