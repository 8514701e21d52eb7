//! HTTP adapter for the PioSwap ledger.
//!
//! Exposes the ledger over the dashboard's REST layout:
//! - Token registry and pool endpoints
//! - Liquidity positions
//! - Swap quotes, execution, trades and price history
//! - Transaction log and protocol statistics
//!
//! Ledger errors map to `404/400/403/500` with a `{"detail": ...}` body.

/// Prelude module for convenient imports.
pub mod prelude;

/// Error types.
pub mod error;
/// Request handlers.
pub mod handlers;
/// API request/response models.
pub mod models;
/// Route definitions.
pub mod routes;
/// Server configuration and startup.
pub mod server;
/// Application state.
pub mod state;

pub use error::{ApiError, ApiResult};
pub use server::{ApiServer, ServerConfig, create_router};
pub use state::AppState;
