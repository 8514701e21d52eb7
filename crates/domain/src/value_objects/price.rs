use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Price of one unit of a base token expressed in a quote token.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price {
    /// Quote units per base unit.
    pub value: Decimal,
}

impl Price {
    /// Wraps a raw price.
    pub fn new(value: Decimal) -> Self {
        Self { value }
    }

    /// Ratio `quote / base`, or `None` when `base` is zero.
    pub fn from_ratio(quote: Decimal, base: Decimal) -> Option<Self> {
        if base.is_zero() {
            return None;
        }
        quote.checked_div(base).map(Self::new)
    }

    /// Base units per quote unit; zero stays zero.
    pub fn invert(&self) -> Self {
        if self.value.is_zero() {
            return Self {
                value: Decimal::ZERO,
            };
        }
        Self {
            value: Decimal::ONE / self.value,
        }
    }
}

impl From<Decimal> for Price {
    fn from(d: Decimal) -> Self {
        Self::new(d)
    }
}
