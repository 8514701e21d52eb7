//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use pioswap_ledger::prelude::*;
//! ```

pub use crate::config::LedgerConfig;
pub use crate::error::{ErrorKind, LedgerError, LedgerResult};
pub use crate::ledger::Ledger;

// History
pub use crate::history::{History, PriceHistory, TransactionWithTokens};

// Locks
pub use crate::locks::{KeyedLocks, LockKey};

// Pools and positions
pub use crate::pool_ledger::{NewPool, PoolLedger};
pub use crate::position_ledger::{AddLiquidity, PositionLedger};

// Tokens
pub use crate::registry::{NewToken, TokenRegistry};

// Stats
pub use crate::stats::StatsAggregator;

// Swaps
pub use crate::swap::{ExecuteSwap, SwapEngine, SwapQuote};
