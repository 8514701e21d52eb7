//! Persistence layer for the PioSwap ledger.
//!
//! The ledger talks to storage only through the traits in [`store`]. Two
//! implementations are provided:
//!
//! - [`MemoryStore`]: in-process record lists, used by tests and the demo server.
//! - [`Database`]: PostgreSQL through sqlx repositories.

pub mod error;
pub mod memory;
pub mod repositories;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use repositories::Database;
pub use store::{
    LedgerStore, PoolStore, PositionStore, StatsStore, TokenStore, TransactionFilter,
    TransactionStore,
};
