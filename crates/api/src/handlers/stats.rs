use crate::error::ApiResult;
use crate::models::RefreshResponse;
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use pioswap_domain::entities::ProtocolStats;

/// `GET /api/stats`
pub async fn get_stats(State(state): State<AppState>) -> ApiResult<Json<ProtocolStats>> {
    Ok(Json(state.ledger.stats().get_stats().await?))
}

/// `POST /api/stats/refresh`
pub async fn refresh(
    State(state): State<AppState>,
) -> ApiResult<Json<RefreshResponse<ProtocolStats>>> {
    let stats = state.ledger.stats().refresh().await?;
    Ok(Json(RefreshResponse {
        message: "Stats refreshed",
        stats,
    }))
}
