use crate::enums::{TransactionStatus, TransactionType};
use crate::value_objects::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An immutable entry of the transaction log.
///
/// For swaps `token0`/`amount0` is the input side and `token1`/`amount1`
/// the output side; for liquidity events they follow the pool's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique identifier.
    pub id: Uuid,
    /// Swap, deposit or withdrawal.
    #[serde(rename = "type")]
    pub kind: TransactionType,
    /// Acting wallet.
    pub wallet_address: Address,
    /// Input token for swaps.
    pub token0_address: Address,
    /// Output token for swaps.
    pub token1_address: Address,
    /// Amount of `token0`.
    pub amount0: Decimal,
    /// Amount of `token1`.
    pub amount1: Decimal,
    /// Chain transaction hash, trimmed and lower-cased.
    pub tx_hash: Option<String>,
    /// Settlement status.
    pub status: TransactionStatus,
    /// When the entry was recorded.
    pub timestamp: DateTime<Utc>,
}

impl Transaction {
    /// A confirmed log entry stamped with the current time.
    pub fn confirmed(
        kind: TransactionType,
        wallet: Address,
        token0: Address,
        token1: Address,
        amount0: Decimal,
        amount1: Decimal,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            wallet_address: wallet,
            token0_address: token0,
            token1_address: token1,
            amount0,
            amount1,
            tx_hash: None,
            status: TransactionStatus::Confirmed,
            timestamp: Utc::now(),
        }
    }

    /// Attaches a chain transaction hash.
    #[must_use]
    pub fn with_tx_hash(mut self, tx_hash: Option<String>) -> Self {
        self.tx_hash = tx_hash;
        self
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Whether the entry trades `a` against `b` in either order.
    pub fn involves_pair(&self, a: &Address, b: &Address) -> bool {
        (&self.token0_address == a && &self.token1_address == b)
            || (&self.token0_address == b && &self.token1_address == a)
    }
}
