use crate::value_objects::Address;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Registry entry for a tradable token.
///
/// Identity fields are fixed at registration; `price` and
/// `price_change_24h` are maintained by an external price feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Contract address; the registry key.
    pub address: Address,
    /// Ticker, e.g. `PIO`.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// On-chain decimals.
    pub decimals: u8,
    /// Logo URL.
    pub logo: Option<String>,
    /// Whether this is the chain's native coin.
    pub is_native: bool,
    /// Oracle price in USD; zero when unpriced.
    pub price: Decimal,
    /// 24h price change in percent.
    pub price_change_24h: Decimal,
    /// Registration time.
    pub created_at: DateTime<Utc>,
}

impl Token {
    /// An unpriced, non-native token.
    pub fn new(
        address: Address,
        symbol: impl Into<String>,
        name: impl Into<String>,
        decimals: u8,
    ) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            name: name.into(),
            decimals,
            logo: None,
            is_native: false,
            price: Decimal::ZERO,
            price_change_24h: Decimal::ZERO,
            created_at: Utc::now(),
        }
    }

    /// Sets the oracle price.
    #[must_use]
    pub fn with_price(mut self, price: Decimal) -> Self {
        self.price = price;
        self
    }

    /// Sets the 24h price change.
    #[must_use]
    pub fn with_price_change(mut self, change: Decimal) -> Self {
        self.price_change_24h = change;
        self
    }

    /// Sets the logo URL.
    #[must_use]
    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    /// Marks the token as the native coin.
    #[must_use]
    pub fn native(mut self) -> Self {
        self.is_native = true;
        self
    }
}
