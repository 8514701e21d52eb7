use crate::error::ApiResult;
use crate::models::{LimitQuery, TransactionResponse};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Path, Query, State};
use pioswap_domain::value_objects::Address;

const DEFAULT_WALLET_LIMIT: usize = 50;
const DEFAULT_RECENT_LIMIT: usize = 100;

/// `GET /api/transactions`
pub async fn recent(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<TransactionResponse>>> {
    let log = state
        .ledger
        .history()
        .recent_transactions(query.limit.unwrap_or(DEFAULT_RECENT_LIMIT))
        .await?;
    Ok(Json(log.into_iter().map(Into::into).collect()))
}

/// `GET /api/transactions/{wallet}`
pub async fn for_wallet(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<TransactionResponse>>> {
    let wallet = Address::parse(&wallet)?;
    let log = state
        .ledger
        .history()
        .wallet_transactions(&wallet, query.limit.unwrap_or(DEFAULT_WALLET_LIMIT))
        .await?;
    Ok(Json(log.into_iter().map(Into::into).collect()))
}
