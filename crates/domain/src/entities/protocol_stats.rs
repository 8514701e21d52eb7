use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Protocol-wide figures, derived entirely from pools and the transaction
/// log. Safe to delete and recompute.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProtocolStats {
    /// Lifetime swap volume in USD.
    pub total_volume: Decimal,
    /// Sum of pool TVLs.
    pub tvl: Decimal,
    /// Distinct wallets in the log.
    pub total_swappers: u64,
    /// Sum of pool volumes.
    pub volume_24h: Decimal,
    /// Log entries counted.
    pub transactions_24h: u64,
    /// Registered pools.
    pub active_pools: u64,
    /// Set when the record is persisted; `None` on a pure recomputation.
    pub updated_at: Option<DateTime<Utc>>,
}

impl ProtocolStats {
    /// Adds one swap worth `volume` quote units to the running counters.
    pub fn with_swap(&self, volume: Decimal) -> Option<Self> {
        Some(Self {
            total_volume: self.total_volume.checked_add(volume)?,
            volume_24h: self.volume_24h.checked_add(volume)?,
            transactions_24h: self.transactions_24h.saturating_add(1),
            ..self.clone()
        })
    }
}
