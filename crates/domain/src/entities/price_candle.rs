use crate::value_objects::price::Price;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLC summary of a pair's trades.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceCandle {
    /// UTC day the candle covers.
    pub day: NaiveDate,
    /// Unix timestamp of the day's midnight (UTC).
    pub start_timestamp: i64,

    /// First trade price of the day.
    pub open: Price,
    /// Highest trade price.
    pub high: Price,
    /// Lowest trade price.
    pub low: Price,
    /// Last trade price of the day.
    pub close: Price,

    /// Number of trades in the day.
    pub volume: u64,
}
