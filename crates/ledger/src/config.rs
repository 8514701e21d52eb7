//! Ledger configuration.

use pioswap_domain::math::{DEFAULT_FEE_TIER, DEFAULT_SLIPPAGE};
use rust_decimal::Decimal;

/// Tunables shared by every ledger component.
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Fee tier (percent) used when quoting a pair without a pool.
    pub default_fee_tier: Decimal,
    /// Slippage tolerance (percent) applied to `minimum_received`.
    pub default_slippage: Decimal,
    /// Upper bound for every caller-supplied page size.
    pub max_page_size: usize,
    /// Maximum number of log entries scanned by batch computations.
    pub stats_scan_limit: usize,
    /// Longest window accepted by the price history.
    pub max_history_days: u32,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            default_fee_tier: DEFAULT_FEE_TIER, // 0.3%
            default_slippage: DEFAULT_SLIPPAGE, // 0.5%
            max_page_size: 1000,
            stats_scan_limit: 10_000,
            max_history_days: 365,
        }
    }
}

impl LedgerConfig {
    /// Clamps a requested page size into `1..=max_page_size`.
    #[must_use]
    pub fn page_size(&self, requested: usize) -> usize {
        requested.clamp(1, self.max_page_size.max(1))
    }

    /// Clamps a requested history window into `1..=max_history_days`.
    #[must_use]
    pub fn history_days(&self, requested: u32) -> u32 {
        requested.clamp(1, self.max_history_days.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_size_is_clamped_not_capped_low() {
        let config = LedgerConfig::default();
        assert_eq!(config.page_size(0), 1);
        assert_eq!(config.page_size(50), 50);
        assert_eq!(config.page_size(1000), 1000);
        assert_eq!(config.page_size(5000), 1000);
    }

    #[test]
    fn test_history_days_clamp() {
        let config = LedgerConfig::default();
        assert_eq!(config.history_days(0), 1);
        assert_eq!(config.history_days(30), 30);
        assert_eq!(config.history_days(10_000), 365);
    }
}
