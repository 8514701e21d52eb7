use crate::error::ApiResult;
use crate::models::{LimitQuery, PositionResponse, RemovePositionRequest};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use pioswap_domain::value_objects::Address;
use pioswap_ledger::position_ledger::AddLiquidity;

/// `GET /api/positions/{wallet}`
pub async fn list_positions(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<PositionResponse>>> {
    let wallet = Address::parse(&wallet)?;
    let limit = query.limit.unwrap_or(state.ledger.config().max_page_size);
    let positions = state.ledger.positions().list_positions(&wallet, limit).await?;
    Ok(Json(positions.into_iter().map(Into::into).collect()))
}

/// `POST /api/positions/add`
pub async fn add_liquidity(
    State(state): State<AppState>,
    payload: Result<Json<AddLiquidity>, JsonRejection>,
) -> ApiResult<Json<PositionResponse>> {
    let Json(request) = payload?;
    let position = state.ledger.positions().add_liquidity(request).await?;
    Ok(Json(position.into()))
}

/// `POST /api/positions/remove`
pub async fn remove_liquidity(
    State(state): State<AppState>,
    payload: Result<Json<RemovePositionRequest>, JsonRejection>,
) -> ApiResult<Json<PositionResponse>> {
    let Json(request) = payload?;
    let position = state
        .ledger
        .positions()
        .remove_liquidity(request.position_id, &request.wallet_address, request.percent)
        .await?;
    Ok(Json(position.into()))
}
