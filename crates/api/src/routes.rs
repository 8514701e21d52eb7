//! Route table.
//!
//! Paths follow the dashboard's `/api/...` layout.

use crate::handlers::{self, pools, positions, stats, swap, tokens, transactions};
use crate::state::AppState;
use axum::Router;
use axum::routing::{get, post};

pub fn token_routes() -> Router<AppState> {
    Router::new()
        .route("/tokens", get(tokens::list_tokens).post(tokens::create_token))
        .route("/tokens/{address}", get(tokens::get_token))
}

pub fn pool_routes() -> Router<AppState> {
    Router::new()
        .route("/pools", get(pools::list_pools).post(pools::create_pool))
        .route("/pools/add-liquidity", post(pools::add_liquidity))
        .route("/pools/remove-liquidity", post(pools::remove_liquidity))
        .route("/pools/{id}", get(pools::get_pool))
}

pub fn position_routes() -> Router<AppState> {
    Router::new()
        .route("/positions/add", post(positions::add_liquidity))
        .route("/positions/remove", post(positions::remove_liquidity))
        .route("/positions/{wallet}", get(positions::list_positions))
}

pub fn swap_routes() -> Router<AppState> {
    Router::new()
        .route("/swap/quote", post(swap::quote))
        .route("/swap/execute", post(swap::execute))
        .route("/swap/trades/{token0}/{token1}", get(swap::trades))
        .route(
            "/swap/price-history/{token0}/{token1}",
            get(swap::price_history),
        )
}

pub fn transaction_routes() -> Router<AppState> {
    Router::new()
        .route("/transactions", get(transactions::recent))
        .route("/transactions/{wallet}", get(transactions::for_wallet))
}

pub fn stats_routes() -> Router<AppState> {
    Router::new()
        .route("/stats", get(stats::get_stats))
        .route("/stats/refresh", post(stats::refresh))
}

/// Every endpoint, relative to the `/api` prefix.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .merge(token_routes())
        .merge(pool_routes())
        .merge(position_routes())
        .merge(swap_routes())
        .merge(transaction_routes())
        .merge(stats_routes())
}
