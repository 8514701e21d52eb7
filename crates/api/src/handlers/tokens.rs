use crate::error::ApiResult;
use crate::models::LimitQuery;
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use pioswap_domain::entities::Token;
use pioswap_domain::value_objects::Address;
use pioswap_ledger::registry::NewToken;

/// `GET /api/tokens`
pub async fn list_tokens(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<Token>>> {
    let limit = query.limit.unwrap_or(state.ledger.config().max_page_size);
    Ok(Json(state.ledger.registry().list_tokens(limit).await?))
}

/// `GET /api/tokens/{address}`
pub async fn get_token(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<Token>> {
    let address = Address::parse(&address)?;
    Ok(Json(state.ledger.registry().get_token(&address).await?))
}

/// `POST /api/tokens`
pub async fn create_token(
    State(state): State<AppState>,
    payload: Result<Json<NewToken>, JsonRejection>,
) -> ApiResult<Json<Token>> {
    let Json(new) = payload?;
    Ok(Json(state.ledger.registry().register_token(new).await?))
}
