use crate::error::{ApiError, ApiResult};
use crate::models::{LimitQuery, PoolDepositRequest, PoolResponse, PoolWithdrawRequest};
use crate::state::AppState;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use pioswap_domain::entities::{Pool, PoolId};
use pioswap_ledger::LedgerError;
use pioswap_ledger::pool_ledger::NewPool;
use uuid::Uuid;

/// Embeds the pool's tokens; `None` when either is no longer registered.
pub(crate) async fn with_tokens(state: &AppState, pool: Pool) -> ApiResult<Option<PoolResponse>> {
    let registry = state.ledger.registry();
    let token0 = match registry.get_token(&pool.token0_address).await {
        Ok(token) => token,
        Err(LedgerError::TokenNotFound(_)) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    let token1 = match registry.get_token(&pool.token1_address).await {
        Ok(token) => token,
        Err(LedgerError::TokenNotFound(_)) => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    Ok(Some(PoolResponse::new(pool, token0, token1)))
}

async fn respond(state: &AppState, pool: Pool) -> ApiResult<Json<PoolResponse>> {
    with_tokens(state, pool)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Pool tokens not found".into()))
}

fn parse_pool_id(raw: &str) -> ApiResult<PoolId> {
    Uuid::parse_str(raw)
        .map(PoolId)
        .map_err(|_| ApiError::NotFound("Pool not found".into()))
}

/// `GET /api/pools`
pub async fn list_pools(
    State(state): State<AppState>,
    Query(query): Query<LimitQuery>,
) -> ApiResult<Json<Vec<PoolResponse>>> {
    let limit = query.limit.unwrap_or(state.ledger.config().max_page_size);
    let pools = state.ledger.pools().list_pools(limit).await?;
    let mut result = Vec::with_capacity(pools.len());
    for pool in pools {
        if let Some(response) = with_tokens(&state, pool).await? {
            result.push(response);
        }
    }
    Ok(Json(result))
}

/// `GET /api/pools/{id}`
pub async fn get_pool(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<PoolResponse>> {
    let pool = state.ledger.pools().get_pool(parse_pool_id(&id)?).await?;
    respond(&state, pool).await
}

/// `POST /api/pools`
pub async fn create_pool(
    State(state): State<AppState>,
    payload: Result<Json<NewPool>, JsonRejection>,
) -> ApiResult<Json<PoolResponse>> {
    let Json(new) = payload?;
    let pool = state.ledger.pools().register_pool(new).await?;
    respond(&state, pool).await
}

/// `POST /api/pools/add-liquidity`
pub async fn add_liquidity(
    State(state): State<AppState>,
    payload: Result<Json<PoolDepositRequest>, JsonRejection>,
) -> ApiResult<Json<PoolResponse>> {
    let Json(request) = payload?;
    let pool = state
        .ledger
        .pools()
        .add_pool_liquidity(
            request.pool_id,
            &request.wallet_address,
            request.amount0,
            request.amount1,
        )
        .await?;
    respond(&state, pool).await
}

/// `POST /api/pools/remove-liquidity`
pub async fn remove_liquidity(
    State(state): State<AppState>,
    payload: Result<Json<PoolWithdrawRequest>, JsonRejection>,
) -> ApiResult<Json<PoolResponse>> {
    let Json(request) = payload?;
    let pool = state
        .ledger
        .pools()
        .remove_pool_liquidity(request.pool_id, &request.wallet_address, request.percent)
        .await?;
    respond(&state, pool).await
}
