//! Pure accounting math shared by the ledger components.

pub mod liquidity;
pub mod oracle_pricing;
pub mod pool_metrics;

pub use liquidity::liquidity_share;
pub use oracle_pricing::{DEFAULT_FEE_TIER, DEFAULT_SLIPPAGE, PricingError, QuoteBreakdown};
pub use pool_metrics::{estimated_apr, total_value_locked};
