//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use pioswap_domain::prelude::*;
//! ```

// Entities
pub use crate::entities::{
    Pool, PoolId, Position, PositionId, PriceCandle, ProtocolStats, Token, Trade, Transaction,
    Withdrawal,
};

// Enums
pub use crate::enums::{TransactionStatus, TransactionType};

// Math
pub use crate::math::{
    DEFAULT_FEE_TIER, DEFAULT_SLIPPAGE, PricingError, QuoteBreakdown, estimated_apr,
    liquidity_share, total_value_locked,
};

// Value objects
pub use crate::value_objects::{Address, AddressError, Percentage, Price, PriceRange};
