//! Case-normalized account and contract addresses.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Error returned when an address string cannot be used as a lookup key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// The address was empty after trimming.
    #[error("address must not be empty")]
    Empty,
    /// The address contained whitespace or control characters.
    #[error("address contains invalid characters: {0}")]
    InvalidCharacters(String),
}

/// A wallet, token or pair address, always stored in lower case.
///
/// Every lookup or write keyed by an address goes through this type, so two
/// spellings of the same hex address always resolve to the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Address(String);

impl Address {
    /// Normalizes `raw` (trim + lower case) and validates it.
    pub fn parse(raw: &str) -> Result<Self, AddressError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(AddressError::Empty);
        }
        if trimmed.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(AddressError::InvalidCharacters(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Returns the normalized address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the address and returns the normalized string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
