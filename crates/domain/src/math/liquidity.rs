//! Geometric-mean liquidity share.

use rust_decimal::{Decimal, MathematicalOps};

/// Liquidity share of a deposit: `sqrt(amount0 * amount1)`.
///
/// Returns zero when either side is not positive, which is how a drained
/// position reports its share.
pub fn liquidity_share(amount0: Decimal, amount1: Decimal) -> Decimal {
    if amount0 <= Decimal::ZERO || amount1 <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    match amount0.checked_mul(amount1) {
        Some(product) => product.sqrt().unwrap_or(Decimal::ZERO),
        // sqrt(a*b) == sqrt(a)*sqrt(b) keeps large deposits representable
        None => match (amount0.sqrt(), amount1.sqrt()) {
            (Some(a), Some(b)) => a.checked_mul(b).unwrap_or(Decimal::MAX),
            _ => Decimal::ZERO,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_square_deposit() {
        let eps = dec!(0.0000001);
        assert!((liquidity_share(dec!(100), dec!(100)) - dec!(100)).abs() < eps);
        assert!((liquidity_share(dec!(4), dec!(9)) - dec!(6)).abs() < eps);
    }

    #[test]
    fn test_non_positive_side_is_zero() {
        assert_eq!(liquidity_share(dec!(0), dec!(100)), Decimal::ZERO);
        assert_eq!(liquidity_share(dec!(100), dec!(-1)), Decimal::ZERO);
    }

    #[test]
    fn test_uneven_deposit() {
        let share = liquidity_share(dec!(100), dec!(245));
        // sqrt(24500) = 156.5247584...
        assert!((share - dec!(156.5247584)).abs() < dec!(0.0000001));
    }

    #[test]
    fn test_huge_deposit_does_not_overflow() {
        let big = Decimal::from(10u64.pow(18));
        let side = big * dec!(1000);
        let share = liquidity_share(side, side);
        assert!((share - side).abs() < dec!(1));
    }
}
