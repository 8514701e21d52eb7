//! Request handlers, one module per resource.

pub mod pools;
pub mod positions;
pub mod stats;
pub mod swap;
pub mod tokens;
pub mod transactions;

use crate::models::ServiceInfo;
use axum::Json;

/// `GET /api`
pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "PioSwap DEX API is running",
        network: "PIOGOLD Mainnet",
        chain_id: 42357,
    })
}
