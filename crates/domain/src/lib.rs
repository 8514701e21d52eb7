//! Domain model of the PioSwap accounting engine.
//!
//! This crate holds the records the ledger maintains and the pure math it
//! applies to them:
//! - Tokens, pools, positions, transactions and protocol statistics
//! - Case-normalized addresses, prices, price ranges and percentages
//! - Liquidity share, TVL/APR and oracle-priced swap quotes

/// Prelude module for convenient imports.
pub mod prelude;

/// Records owned by the ledger.
pub mod entities;
/// Closed enumerations stored with the records.
pub mod enums;
/// Pure accounting math.
pub mod math;
/// Small validated value types.
pub mod value_objects;
