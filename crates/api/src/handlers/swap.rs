use crate::error::ApiResult;
use crate::models::{DaysQuery, LimitQuery, PriceHistoryResponse, QuoteRequest};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use pioswap_domain::entities::{Trade, Transaction};
use pioswap_domain::value_objects::Address;
use pioswap_ledger::swap::{ExecuteSwap, SwapQuote};

const DEFAULT_TRADE_LIMIT: usize = 50;
const DEFAULT_HISTORY_DAYS: u32 = 30;

/// `POST /api/swap/quote`
pub async fn quote(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> ApiResult<Json<SwapQuote>> {
    let Json(request) = payload?;
    let quote = state
        .ledger
        .swaps()
        .quote(&request.token_in, &request.token_out, request.amount_in)
        .await?;
    Ok(Json(quote))
}

/// `POST /api/swap/execute`
pub async fn execute(
    State(state): State<AppState>,
    payload: Result<Json<ExecuteSwap>, JsonRejection>,
) -> ApiResult<Json<Transaction>> {
    let Json(request) = payload?;
    Ok(Json(state.ledger.swaps().execute(request).await?))
}

/// `GET /api/swap/trades/{token0}/{token1}`
pub async fn trades(
    State(state): State<AppState>,
    Path((token0, token1)): Path<(String, String)>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<Trade>>> {
    let token0 = Address::parse(&token0)?;
    let token1 = Address::parse(&token1)?;
    let trades = state
        .ledger
        .history()
        .trade_history(&token0, &token1, query.limit.unwrap_or(DEFAULT_TRADE_LIMIT))
        .await?;
    Ok(Json(trades))
}

/// `GET /api/swap/price-history/{token0}/{token1}`
pub async fn price_history(
    State(state): State<AppState>,
    Path((token0, token1)): Path<(String, String)>,
    Query(query): Query<DaysQuery>,
) -> ApiResult<Json<PriceHistoryResponse>> {
    let token0 = Address::parse(&token0)?;
    let token1 = Address::parse(&token1)?;
    let history = state
        .ledger
        .history()
        .price_history(&token0, &token1, query.days.unwrap_or(DEFAULT_HISTORY_DAYS))
        .await?;
    Ok(Json(history.into()))
}
