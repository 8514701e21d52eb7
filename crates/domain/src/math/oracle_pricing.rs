//! Swap quotes priced from oracle token prices.
//!
//! The dashboard quotes swaps from the registry's token prices rather than
//! from pool reserves; there is no bonding curve here. Price impact is a
//! step function of the trade size.

use crate::value_objects::Percentage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fee tier applied when no pool exists for the pair (0.3 %).
pub const DEFAULT_FEE_TIER: Decimal = Decimal::from_parts(3, 0, 0, false, 1);
/// Slippage tolerance used for `minimum_received` (0.5 %).
pub const DEFAULT_SLIPPAGE: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
/// Decimal places of every monetary quote output.
pub const QUOTE_DECIMALS: u32 = 6;

const SMALL_TRADE: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);
const MEDIUM_TRADE: Decimal = Decimal::from_parts(10_000, 0, 0, false, 0);

/// Errors produced while pricing a quote.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    /// The output token has no price, so no exchange rate exists.
    #[error("output token price is zero")]
    ZeroOutputPrice,
    /// An intermediate value exceeded the decimal range.
    #[error("quote amount out of range")]
    Overflow,
}

/// Every figure of a quote, rounded to [`QUOTE_DECIMALS`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteBreakdown {
    /// `price_in / price_out`.
    pub exchange_rate: Decimal,
    /// `amount_in * exchange_rate`.
    pub amount_out_before_fee: Decimal,
    /// Fee tier applied to the gross output.
    pub fee: Decimal,
    /// Gross output less the fee.
    pub amount_out: Decimal,
    /// Tiered by `amount_in`, in percent.
    pub price_impact: Decimal,
    /// `amount_out` less slippage.
    pub minimum_received: Decimal,
}

/// Estimated price impact in percent for a trade of `amount_in` units.
pub fn price_impact(amount_in: Decimal) -> Percentage {
    if amount_in < SMALL_TRADE {
        Percentage(Decimal::new(1, 1))
    } else if amount_in < MEDIUM_TRADE {
        Percentage(Decimal::new(5, 1))
    } else {
        Percentage(Decimal::ONE)
    }
}

/// Prices `amount_in` of a token worth `price_in` into a token worth
/// `price_out`, charging `fee_tier` on the output.
pub fn quote(
    amount_in: Decimal,
    price_in: Decimal,
    price_out: Decimal,
    fee_tier: Percentage,
    slippage: Percentage,
) -> Result<QuoteBreakdown, PricingError> {
    if price_out.is_zero() {
        return Err(PricingError::ZeroOutputPrice);
    }
    let exchange_rate = price_in
        .checked_div(price_out)
        .ok_or(PricingError::Overflow)?;
    let gross = amount_in
        .checked_mul(exchange_rate)
        .ok_or(PricingError::Overflow)?;
    let fee = fee_tier.of(gross).ok_or(PricingError::Overflow)?;
    let net = gross - fee;
    let minimum_received = net
        .checked_mul(Decimal::ONE - slippage.as_fraction())
        .ok_or(PricingError::Overflow)?;

    Ok(QuoteBreakdown {
        exchange_rate: exchange_rate.round_dp(QUOTE_DECIMALS),
        amount_out_before_fee: gross.round_dp(QUOTE_DECIMALS),
        fee: fee.round_dp(QUOTE_DECIMALS),
        amount_out: net.round_dp(QUOTE_DECIMALS),
        price_impact: price_impact(amount_in).0.round_dp(2),
        minimum_received: minimum_received.round_dp(QUOTE_DECIMALS),
    })
}
