//! Transaction, trade and price history queries.
//!
//! Trades are swap log entries re-expressed in a requested pair
//! orientation; candles summarize them per UTC day.

use crate::config::LedgerConfig;
use crate::error::LedgerResult;
use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use pioswap_data::{LedgerStore, TokenStore, TransactionFilter, TransactionStore};
use pioswap_domain::entities::{PriceCandle, Token, Trade, Transaction};
use pioswap_domain::enums::TransactionType;
use pioswap_domain::value_objects::{Address, Price};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// A log entry with both of its tokens resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionWithTokens {
    /// The logged entry.
    pub transaction: Transaction,
    /// Token behind `transaction.token0_address`.
    pub token0: Token,
    /// Token behind `transaction.token1_address`.
    pub token1: Token,
}

/// Daily candles for a pair plus the oracle reference price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceHistory {
    /// Whether any trade fell inside the window.
    pub has_real_data: bool,
    /// `price(token0) / price(token1)` from the registry; zero when either
    /// token is unknown or unpriced.
    pub base_price: Price,
    /// One candle per day with trades, oldest first.
    pub candles: Vec<PriceCandle>,
}

/// Read-only views over the transaction log.
#[derive(Clone)]
pub struct History {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
}

impl History {
    /// Creates read views over `store`.
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// A wallet's entries, newest first.
    pub async fn wallet_transactions(
        &self,
        wallet: &Address,
        limit: usize,
    ) -> LedgerResult<Vec<TransactionWithTokens>> {
        let log = self
            .store
            .find_transactions(
                &TransactionFilter::by_wallet(wallet.clone()),
                self.config.page_size(limit),
            )
            .await?;
        self.with_tokens(log).await
    }

    /// The most recent entries across all wallets.
    pub async fn recent_transactions(&self, limit: usize) -> LedgerResult<Vec<TransactionWithTokens>> {
        let log = self
            .store
            .find_transactions(&TransactionFilter::all(), self.config.page_size(limit))
            .await?;
        self.with_tokens(log).await
    }

    /// Swaps of the pair in either direction, newest first, expressed in
    /// `(token0, token1)` order.
    pub async fn trade_history(
        &self,
        token0: &Address,
        token1: &Address,
        limit: usize,
    ) -> LedgerResult<Vec<Trade>> {
        let filter = TransactionFilter::by_pair(token0.clone(), token1.clone())
            .of_kind(TransactionType::Swap);
        let swaps = self
            .store
            .find_transactions(&filter, self.config.page_size(limit))
            .await?;
        Ok(swaps
            .iter()
            .filter_map(|swap| normalize_trade(swap, token0))
            .collect())
    }

    /// Daily OHLC candles of the pair's trades over the last `days` days.
    pub async fn price_history(
        &self,
        token0: &Address,
        token1: &Address,
        days: u32,
    ) -> LedgerResult<PriceHistory> {
        let days = self.config.history_days(days);
        let since = Utc::now() - Duration::days(i64::from(days));
        let filter = TransactionFilter::by_pair(token0.clone(), token1.clone())
            .of_kind(TransactionType::Swap)
            .since(since);
        let swaps = self
            .store
            .find_transactions(&filter, self.config.stats_scan_limit)
            .await?;

        let trades: Vec<Trade> = swaps
            .iter()
            .filter_map(|swap| normalize_trade(swap, token0))
            .collect();
        let candles = daily_candles(&trades);

        let price0 = self.store.find_token(token0).await?.map(|t| t.price);
        let price1 = self.store.find_token(token1).await?.map(|t| t.price);
        let base_price = match (price0, price1) {
            (Some(p0), Some(p1)) => Price::from_ratio(p0, p1).unwrap_or_default(),
            _ => Price::default(),
        };

        Ok(PriceHistory {
            has_real_data: !candles.is_empty(),
            base_price,
            candles,
        })
    }

    async fn with_tokens(&self, log: Vec<Transaction>) -> LedgerResult<Vec<TransactionWithTokens>> {
        let mut tokens: HashMap<Address, Option<Token>> = HashMap::new();
        let mut joined = Vec::with_capacity(log.len());
        for transaction in log {
            let token0 = self.cached_token(&mut tokens, &transaction.token0_address).await?;
            let token1 = self.cached_token(&mut tokens, &transaction.token1_address).await?;
            // entries whose tokens were never registered are not shown
            if let (Some(token0), Some(token1)) = (token0, token1) {
                joined.push(TransactionWithTokens {
                    transaction,
                    token0,
                    token1,
                });
            }
        }
        Ok(joined)
    }

    async fn cached_token(
        &self,
        cache: &mut HashMap<Address, Option<Token>>,
        address: &Address,
    ) -> LedgerResult<Option<Token>> {
        if let Some(token) = cache.get(address) {
            return Ok(token.clone());
        }
        let token = self.store.find_token(address).await?;
        cache.insert(address.clone(), token.clone());
        Ok(token)
    }
}

/// Re-expresses a swap in `(token0, other)` order. Swaps with a zero amount
/// have no price and are dropped.
fn normalize_trade(swap: &Transaction, token0: &Address) -> Option<Trade> {
    let (amount0, amount1) = if &swap.token0_address == token0 {
        (swap.amount0, swap.amount1)
    } else {
        (swap.amount1, swap.amount0)
    };
    if amount0.is_zero() || amount1.is_zero() {
        return None;
    }
    Some(Trade {
        id: swap.id,
        wallet_address: swap.wallet_address.clone(),
        token0_amount: amount0,
        token1_amount: amount1,
        price: Price::from_ratio(amount1, amount0)?,
        tx_hash: swap.tx_hash.clone(),
        timestamp: swap.timestamp,
    })
}

/// Groups trades into one candle per UTC day, oldest day first.
fn daily_candles(trades: &[Trade]) -> Vec<PriceCandle> {
    let mut ascending: Vec<&Trade> = trades.iter().collect();
    ascending.sort_by_key(|t| t.timestamp);

    let mut days: BTreeMap<NaiveDate, PriceCandle> = BTreeMap::new();
    for trade in ascending {
        let day = trade.timestamp.date_naive();
        days.entry(day)
            .and_modify(|candle| {
                candle.high = candle.high.max(trade.price);
                candle.low = candle.low.min(trade.price);
                candle.close = trade.price;
                candle.volume += 1;
            })
            .or_insert_with(|| PriceCandle {
                day,
                start_timestamp: day_start(day).timestamp(),
                open: trade.price,
                high: trade.price,
                low: trade.price,
                close: trade.price,
                volume: 1,
            });
    }
    days.into_values().collect()
}

fn day_start(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PETH, PIO, USDT, addr, seeded_store};
    use chrono::TimeZone;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    async fn fixture() -> (Arc<dyn LedgerStore>, History) {
        let store = seeded_store().await;
        let history = History::new(store.clone(), LedgerConfig::default());
        (store, history)
    }

    fn swap(token0: &str, token1: &str, a0: Decimal, a1: Decimal) -> Transaction {
        Transaction::confirmed(
            TransactionType::Swap,
            addr("0xtrader"),
            addr(token0),
            addr(token1),
            a0,
            a1,
        )
    }

    #[tokio::test]
    async fn test_reverse_direction_trade_is_inverted() {
        let (store, history) = fixture().await;
        // stored as USDT -> PIO
        store
            .append_transaction(&swap(USDT, PIO, dec!(245), dec!(100)))
            .await
            .unwrap();

        let trades = history.trade_history(&addr(PIO), &addr(USDT), 50).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].token0_amount, dec!(100));
        assert_eq!(trades[0].token1_amount, dec!(245));
        assert_eq!(trades[0].price.value, dec!(2.45));

        let reversed = history.trade_history(&addr(USDT), &addr(PIO), 50).await.unwrap();
        assert_eq!(reversed[0].token0_amount, dec!(245));
        assert_eq!(reversed[0].price.value, dec!(100) / dec!(245));
    }

    #[tokio::test]
    async fn test_trade_history_skips_zero_amounts_and_other_pairs() {
        let (store, history) = fixture().await;
        for tx in [
            swap(PIO, USDT, dec!(1), dec!(0)),
            swap(PETH, USDT, dec!(1), dec!(2320.5)),
            swap(PIO, USDT, dec!(2), dec!(4.9)),
        ] {
            store.append_transaction(&tx).await.unwrap();
        }
        let trades = history.trade_history(&addr(PIO), &addr(USDT), 50).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].token0_amount, dec!(2));
    }

    #[tokio::test]
    async fn test_price_history_without_trades() {
        let (_, history) = fixture().await;
        let result = history.price_history(&addr(PIO), &addr(USDT), 30).await.unwrap();
        assert!(!result.has_real_data);
        assert!(result.candles.is_empty());
        assert_eq!(result.base_price.value, dec!(2.45));
    }

    #[tokio::test]
    async fn test_price_history_groups_by_day() {
        let (store, history) = fixture().await;
        let today = Utc::now().date_naive();
        let yesterday = today - Duration::days(1);
        let at = |day: NaiveDate, hour: u32| {
            Utc.from_utc_datetime(&day.and_hms_opt(hour, 0, 0).unwrap())
        };

        for tx in [
            swap(PIO, USDT, dec!(1), dec!(2.40)).at(at(yesterday, 9)),
            swap(USDT, PIO, dec!(2.50), dec!(1)).at(at(yesterday, 12)),
            swap(PIO, USDT, dec!(1), dec!(2.30)).at(at(yesterday, 15)),
            swap(PIO, USDT, dec!(1), dec!(2.44)).at(at(yesterday, 18)),
            swap(PIO, USDT, dec!(1), dec!(2.45)).at(at(today, 0)),
        ] {
            store.append_transaction(&tx).await.unwrap();
        }

        let result = history.price_history(&addr(PIO), &addr(USDT), 30).await.unwrap();
        assert!(result.has_real_data);
        assert_eq!(result.candles.len(), 2);

        let first = &result.candles[0];
        assert_eq!(first.day, yesterday);
        assert_eq!(first.open.value, dec!(2.40));
        assert_eq!(first.high.value, dec!(2.50));
        assert_eq!(first.low.value, dec!(2.30));
        assert_eq!(first.close.value, dec!(2.44));
        assert_eq!(first.volume, 4);
        assert_eq!(first.start_timestamp, at(yesterday, 0).timestamp());

        assert_eq!(result.candles[1].volume, 1);
    }

    #[tokio::test]
    async fn test_price_history_ignores_trades_outside_window() {
        let (store, history) = fixture().await;
        store
            .append_transaction(
                &swap(PIO, USDT, dec!(1), dec!(2)).at(Utc::now() - Duration::days(10)),
            )
            .await
            .unwrap();
        let result = history.price_history(&addr(PIO), &addr(USDT), 7).await.unwrap();
        assert!(!result.has_real_data);
    }

    #[tokio::test]
    async fn test_transactions_are_joined_with_tokens() {
        let (store, history) = fixture().await;
        store
            .append_transaction(&swap(PIO, USDT, dec!(1), dec!(2.45)))
            .await
            .unwrap();
        store
            .append_transaction(&swap(PIO, "0xunknown", dec!(1), dec!(1)))
            .await
            .unwrap();

        let recent = history.recent_transactions(100).await.unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].token0.symbol, "PIO");
        assert_eq!(recent[0].token1.symbol, "USDT");

        let mine = history
            .wallet_transactions(&addr("0xTRADER"), 50)
            .await
            .unwrap();
        assert_eq!(mine.len(), 1);
        assert!(
            history
                .wallet_transactions(&addr("0xnobody"), 50)
                .await
                .unwrap()
                .is_empty()
        );
    }
}
