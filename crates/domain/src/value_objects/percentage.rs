use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A percentage on the 0–100 scale (`0.3` means 0.3 %).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percentage(pub Decimal);

impl Percentage {
    /// 0 %.
    pub const ZERO: Self = Self(Decimal::ZERO);
    /// 100 %.
    pub const HUNDRED: Self = Self(Decimal::ONE_HUNDRED);

    /// Clamps an arbitrary caller value into `[0, 100]`.
    pub fn clamped(value: Decimal) -> Self {
        Self(value.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED))
    }

    /// The same quantity as a fraction (`0.3 %` → `0.003`).
    pub fn as_fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// `amount * self / 100`.
    pub fn of(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_mul(self.as_fraction())
    }

    /// Whether this is 100 % or more.
    pub fn is_full(&self) -> bool {
        self.0 >= Decimal::ONE_HUNDRED
    }

    /// Whether this is exactly 0 %.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_clamp() {
        assert_eq!(Percentage::clamped(dec!(150)), Percentage::HUNDRED);
        assert_eq!(Percentage::clamped(dec!(-5)), Percentage::ZERO);
        assert_eq!(Percentage::clamped(dec!(42.5)).0, dec!(42.5));
    }

    #[test]
    fn test_of() {
        assert_eq!(Percentage(dec!(0.3)).of(dec!(245)), Some(dec!(0.735)));
        assert_eq!(Percentage(dec!(50)).of(dec!(10)), Some(dec!(5)));
    }
}
