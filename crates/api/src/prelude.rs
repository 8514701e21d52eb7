//! Prelude module for convenient imports.
//!
//! # Example
//!
//! ```rust
//! use pioswap_api::prelude::*;
//! ```

pub use crate::error::{ApiError, ApiResult};
pub use crate::models::{
    PoolResponse, PositionResponse, PriceHistoryResponse, QuoteRequest, TransactionResponse,
};
pub use crate::server::{ApiServer, ServerConfig, create_router};
pub use crate::state::AppState;
