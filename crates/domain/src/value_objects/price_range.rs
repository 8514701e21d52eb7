use crate::value_objects::price::Price;
use serde::{Deserialize, Serialize};

/// Price band a liquidity position is considered "in range" for.
///
/// An absent upper bound means the band is open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Inclusive lower bound.
    pub lower_price: Price,
    /// Inclusive upper bound; `None` is unbounded.
    pub upper_price: Option<Price>,
}

impl PriceRange {
    /// A band from `lower` to `upper`.
    pub fn new(lower: Price, upper: Option<Price>) -> Self {
        Self {
            lower_price: lower,
            upper_price: upper,
        }
    }

    /// The full `[0, ∞)` band.
    pub fn unbounded() -> Self {
        Self::new(Price::default(), None)
    }

    /// Whether `price` lies inside the band.
    pub fn contains(&self, price: Price) -> bool {
        price.value >= self.lower_price.value
            && self.upper_price.is_none_or(|upper| price.value <= upper.value)
    }

    /// Whether the lower bound does not exceed the upper bound.
    pub fn is_well_formed(&self) -> bool {
        !self.lower_price.value.is_sign_negative()
            && self
                .upper_price
                .is_none_or(|upper| upper.value >= self.lower_price.value)
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::unbounded()
    }
}
