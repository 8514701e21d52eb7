//! Pool, position and swap accounting engine.
//!
//! This crate implements the ledger behind the PioSwap dashboard:
//! - Token registry and pool registration with creator-gated liquidity
//! - Liquidity positions with merge, partial and full withdrawal
//! - Oracle-priced swap quotes and idempotent swap execution
//! - Transaction log queries, trade history and daily price candles
//! - Protocol statistics
//!
//! Mutations of one pool are serialized through [`locks::KeyedLocks`];
//! multi-record writes are undone if the transaction log append fails.

/// Prelude module for convenient imports.
pub mod prelude;

/// Ledger configuration.
pub mod config;
/// Error types.
pub mod error;
/// Transaction, trade and price history.
pub mod history;
/// The engine facade.
pub mod ledger;
/// Per-key async locks.
pub mod locks;
/// Pool records and reserves.
pub mod pool_ledger;
/// Liquidity positions.
pub mod position_ledger;
/// Token registry.
pub mod registry;
/// Protocol statistics.
pub mod stats;
/// Swap quotes and execution.
pub mod swap;

mod journal;

#[cfg(test)]
mod test_support;

pub use config::LedgerConfig;
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use ledger::Ledger;
