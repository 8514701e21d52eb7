//! Request and response bodies.
//!
//! Ledger inputs such as [`pioswap_ledger::registry::NewToken`] double as
//! request bodies; the types here cover the remaining shapes.

use chrono::{DateTime, Utc};
use pioswap_domain::entities::{Pool, PoolId, Position, PositionId, PriceCandle, Token, Transaction};
use pioswap_domain::enums::{TransactionStatus, TransactionType};
use pioswap_domain::value_objects::{Address, Price};
use pioswap_ledger::history::{PriceHistory, TransactionWithTokens};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Optional page size.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

/// Optional history window.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct DaysQuery {
    pub days: Option<u32>,
}

/// Service banner returned by `GET /api`.
#[derive(Debug, Clone, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub network: &'static str,
    pub chain_id: u64,
}

/// A pool with both tokens embedded.
#[derive(Debug, Clone, Serialize)]
pub struct PoolResponse {
    pub id: PoolId,
    pub token0: Token,
    pub token1: Token,
    pub fee: Decimal,
    pub tvl: Decimal,
    pub volume_24h: Decimal,
    pub apr: Decimal,
    pub token0_reserve: Decimal,
    pub token1_reserve: Decimal,
    pub creator_address: Option<Address>,
    pub pair_address: Option<Address>,
}

impl PoolResponse {
    pub fn new(pool: Pool, token0: Token, token1: Token) -> Self {
        Self {
            id: pool.id,
            token0,
            token1,
            fee: pool.fee,
            tvl: pool.tvl,
            volume_24h: pool.volume_24h,
            apr: pool.apr,
            token0_reserve: pool.token0_reserve,
            token1_reserve: pool.token1_reserve,
            creator_address: pool.creator_address,
            pair_address: pool.pair_address,
        }
    }
}

/// Body of `POST /api/pools/add-liquidity`.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolDepositRequest {
    pub pool_id: PoolId,
    pub wallet_address: Address,
    pub amount0: Decimal,
    pub amount1: Decimal,
}

/// Body of `POST /api/pools/remove-liquidity`.
#[derive(Debug, Clone, Deserialize)]
pub struct PoolWithdrawRequest {
    pub pool_id: PoolId,
    pub wallet_address: Address,
    pub percent: Decimal,
}

/// A position with its price range flattened.
#[derive(Debug, Clone, Serialize)]
pub struct PositionResponse {
    pub id: PositionId,
    pub pool_id: PoolId,
    pub wallet_address: Address,
    pub token0_amount: Decimal,
    pub token1_amount: Decimal,
    pub min_price: Price,
    /// `null` for an open-ended range.
    pub max_price: Option<Price>,
    pub liquidity: Decimal,
    pub unclaimed_fees: Decimal,
    pub in_range: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Position> for PositionResponse {
    fn from(position: Position) -> Self {
        Self {
            id: position.id,
            pool_id: position.pool_id,
            wallet_address: position.wallet_address,
            token0_amount: position.token0_amount,
            token1_amount: position.token1_amount,
            min_price: position.range.lower_price,
            max_price: position.range.upper_price,
            liquidity: position.liquidity,
            unclaimed_fees: position.unclaimed_fees,
            in_range: position.in_range,
            created_at: position.created_at,
            updated_at: position.updated_at,
        }
    }
}

/// Body of `POST /api/positions/remove`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemovePositionRequest {
    pub position_id: PositionId,
    pub wallet_address: Address,
    #[serde(default = "RemovePositionRequest::full")]
    pub percent: Decimal,
}

impl RemovePositionRequest {
    fn full() -> Decimal {
        Decimal::ONE_HUNDRED
    }
}

/// Body of `POST /api/swap/quote`.
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteRequest {
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: Decimal,
}

/// A log entry with both tokens embedded.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionResponse {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: TransactionType,
    pub wallet_address: Address,
    pub token0: Token,
    pub token1: Token,
    pub amount0: Decimal,
    pub amount1: Decimal,
    pub tx_hash: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub status: TransactionStatus,
}

impl From<TransactionWithTokens> for TransactionResponse {
    fn from(joined: TransactionWithTokens) -> Self {
        let TransactionWithTokens {
            transaction: Transaction {
                id,
                kind,
                wallet_address,
                amount0,
                amount1,
                tx_hash,
                status,
                timestamp,
                ..
            },
            token0,
            token1,
        } = joined;
        Self {
            id,
            kind,
            wallet_address,
            token0,
            token1,
            amount0,
            amount1,
            tx_hash,
            timestamp,
            status,
        }
    }
}

/// One chart candle; `time` is the day's UTC midnight in Unix seconds.
#[derive(Debug, Clone, Serialize)]
pub struct CandleResponse {
    pub time: i64,
    pub open: Price,
    pub high: Price,
    pub low: Price,
    pub close: Price,
    pub volume: u64,
}

impl From<PriceCandle> for CandleResponse {
    fn from(candle: PriceCandle) -> Self {
        Self {
            time: candle.start_timestamp,
            open: candle.open,
            high: candle.high,
            low: candle.low,
            close: candle.close,
            volume: candle.volume,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistoryResponse {
    pub has_real_data: bool,
    pub base_price: Price,
    pub candles: Vec<CandleResponse>,
}

impl From<PriceHistory> for PriceHistoryResponse {
    fn from(history: PriceHistory) -> Self {
        Self {
            has_real_data: history.has_real_data,
            base_price: history.base_price,
            candles: history.candles.into_iter().map(Into::into).collect(),
        }
    }
}

/// Body returned by `POST /api/stats/refresh`.
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse<T> {
    pub message: &'static str,
    pub stats: T,
}
