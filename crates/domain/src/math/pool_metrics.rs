//! TVL and APR of a pool, derived from its reserves.

use rust_decimal::Decimal;

/// TVL above which the APR heuristic adds one more multiple of the base rate.
const APR_TVL_SCALE: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);

/// Value of both reserves in quote-currency units, `None` on overflow.
pub fn total_value_locked(
    reserve0: Decimal,
    price0: Decimal,
    reserve1: Decimal,
    price1: Decimal,
) -> Option<Decimal> {
    reserve0
        .checked_mul(price0)?
        .checked_add(reserve1.checked_mul(price1)?)
}

/// APR heuristic: `min(fee * 100 * (1 + tvl / 1_000_000), 100)`, zero for an
/// empty pool.
///
/// This is the dashboard's defined estimate, not a yield calculation.
pub fn estimated_apr(fee_percent: Decimal, tvl: Decimal) -> Decimal {
    if tvl <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    let growth = Decimal::ONE + tvl / APR_TVL_SCALE;
    fee_percent
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|base| base.checked_mul(growth))
        .map_or(Decimal::ONE_HUNDRED, |apr| apr.min(Decimal::ONE_HUNDRED))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_tvl() {
        let tvl = total_value_locked(dec!(100), dec!(2.45), dec!(245), dec!(1.00)).unwrap();
        assert_eq!(tvl, dec!(490));
    }

    #[test]
    fn test_apr_small_pool() {
        // 0.3 * 100 * (1 + 490 / 1e6) = 30.0147
        assert_eq!(estimated_apr(dec!(0.3), dec!(490)), dec!(30.0147));
    }

    #[test]
    fn test_apr_is_capped() {
        assert_eq!(estimated_apr(dec!(1.0), dec!(5_000_000)), dec!(100));
    }

    #[test]
    fn test_apr_of_empty_pool_is_zero() {
        assert_eq!(estimated_apr(dec!(0.3), Decimal::ZERO), Decimal::ZERO);
    }
}
