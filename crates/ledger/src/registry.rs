//! Token registry.
//!
//! Read-mostly: prices are maintained by an external feed, and the ledger
//! only reads them when repricing pools or quoting swaps.

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};
use pioswap_data::{LedgerStore, TokenStore};
use pioswap_domain::entities::Token;
use pioswap_domain::value_objects::Address;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::info;

/// Input for [`TokenRegistry::register_token`].
#[derive(Debug, Clone, Deserialize)]
pub struct NewToken {
    /// Contract address; lower-cased on parse.
    pub address: Address,
    /// Ticker, e.g. `PIO`.
    pub symbol: String,
    /// Display name.
    pub name: String,
    /// On-chain decimals; 18 when absent.
    #[serde(default = "NewToken::default_decimals")]
    pub decimals: u8,
    /// Logo URL.
    #[serde(default)]
    pub logo: Option<String>,
    /// Whether this is the chain's native coin.
    #[serde(default)]
    pub is_native: bool,
    /// Oracle price in USD.
    #[serde(default)]
    pub price: Decimal,
    /// 24h price change in percent.
    #[serde(default)]
    pub price_change_24h: Decimal,
}

impl NewToken {
    fn default_decimals() -> u8 {
        18
    }
}

/// Lookups and registration of tradable tokens.
#[derive(Clone)]
pub struct TokenRegistry {
    store: Arc<dyn LedgerStore>,
    config: LedgerConfig,
}

impl TokenRegistry {
    /// Creates a registry over `store`.
    pub fn new(store: Arc<dyn LedgerStore>, config: LedgerConfig) -> Self {
        Self { store, config }
    }

    /// Returns the token registered at `address`.
    ///
    /// # Errors
    /// `TokenNotFound` when nothing is registered there.
    pub async fn get_token(&self, address: &Address) -> LedgerResult<Token> {
        self.store
            .find_token(address)
            .await?
            .ok_or_else(|| LedgerError::TokenNotFound(address.clone()))
    }

    /// Lists registered tokens.
    pub async fn list_tokens(&self, limit: usize) -> LedgerResult<Vec<Token>> {
        Ok(self.store.list_tokens(self.config.page_size(limit)).await?)
    }

    /// Registers a new token.
    ///
    /// # Errors
    /// `TokenAlreadyExists` if the address is taken, `InvalidInput` for an
    /// empty symbol or a negative price.
    pub async fn register_token(&self, new: NewToken) -> LedgerResult<Token> {
        if new.symbol.trim().is_empty() {
            return Err(LedgerError::InvalidInput("symbol must not be empty".into()));
        }
        if new.price.is_sign_negative() {
            return Err(LedgerError::InvalidInput("price must not be negative".into()));
        }

        let mut token = Token::new(new.address, new.symbol.trim(), new.name, new.decimals)
            .with_price(new.price)
            .with_price_change(new.price_change_24h);
        token.logo = new.logo;
        token.is_native = new.is_native;

        if !self.store.insert_token(&token).await? {
            return Err(LedgerError::TokenAlreadyExists(token.address));
        }

        info!(address = %token.address, symbol = %token.symbol, "Token registered");
        Ok(token)
    }

    /// Resolves both tokens of a pair.
    ///
    /// # Errors
    /// `TokensNotFound` if either one is unregistered.
    pub async fn resolve_pair(&self, a: &Address, b: &Address) -> LedgerResult<(Token, Token)> {
        let first = self.store.find_token(a).await?;
        let second = self.store.find_token(b).await?;
        match (first, second) {
            (Some(first), Some(second)) => Ok((first, second)),
            _ => Err(LedgerError::TokensNotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{PIO, USDT, addr, seeded_store};
    use rust_decimal_macros::dec;

    fn registry(store: Arc<dyn LedgerStore>) -> TokenRegistry {
        TokenRegistry::new(store, LedgerConfig::default())
    }

    fn new_token(address: &str, symbol: &str) -> NewToken {
        NewToken {
            address: addr(address),
            symbol: symbol.into(),
            name: format!("{symbol} token"),
            decimals: 18,
            logo: None,
            is_native: false,
            price: dec!(1),
            price_change_24h: dec!(0),
        }
    }

    #[tokio::test]
    async fn test_lookup_ignores_address_case() {
        let registry = registry(seeded_store().await);
        registry
            .register_token(new_token("0xAbCdEf", "MIX"))
            .await
            .unwrap();
        let token = registry.get_token(&addr("0XABCDEF")).await.unwrap();
        assert_eq!(token.symbol, "MIX");
        assert_eq!(token.address.as_str(), "0xabcdef");
    }

    #[tokio::test]
    async fn test_missing_token() {
        let registry = registry(seeded_store().await);
        let err = registry.get_token(&addr("0xdead")).await.unwrap_err();
        assert!(matches!(err, LedgerError::TokenNotFound(_)));
    }

    #[tokio::test]
    async fn test_register_duplicate_fails() {
        let registry = registry(seeded_store().await);
        let err = registry
            .register_token(new_token(USDT, "USDT"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::TokenAlreadyExists(_)));
    }

    #[tokio::test]
    async fn test_resolve_pair_requires_both() {
        let registry = registry(seeded_store().await);
        assert!(registry.resolve_pair(&addr(PIO), &addr(USDT)).await.is_ok());
        let err = registry
            .resolve_pair(&addr(PIO), &addr("0xdead"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::TokensNotFound));
    }
}
