//! Ledger error taxonomy.

use pioswap_data::StoreError;
use pioswap_domain::entities::{PoolId, PositionId};
use pioswap_domain::math::PricingError;
use pioswap_domain::value_objects::{Address, AddressError};

/// Coarse classification of a [`LedgerError`], used by adapters to pick a
/// response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    AlreadyExists,
    Unauthorized,
    InvalidInput,
    StoreUnavailable,
}

/// Errors returned by ledger operations.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// One or both tokens of a pair are not registered.
    #[error("One or both tokens not found")]
    TokensNotFound,
    #[error("Token not found: {0}")]
    TokenNotFound(Address),
    #[error("Pool not found: {0}")]
    PoolNotFound(PoolId),
    #[error("Position not found: {0}")]
    PositionNotFound(PositionId),
    #[error("Pool already exists")]
    PoolAlreadyExists,
    #[error("Token already exists: {0}")]
    TokenAlreadyExists(Address),
    /// The caller is not the creator of a creator-gated pool.
    #[error("Only the pool creator can change liquidity of this pool")]
    Unauthorized,
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid percent: {0}")]
    InvalidPercent(String),
    #[error("Invalid token price")]
    InvalidPrice,
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// The store failed; the detail is logged, never shown to callers.
    #[error("operation failed")]
    Store(#[from] StoreError),
}

impl LedgerError {
    /// Maps the error onto the coarse taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::TokensNotFound
            | Self::TokenNotFound(_)
            | Self::PoolNotFound(_)
            | Self::PositionNotFound(_) => ErrorKind::NotFound,
            Self::PoolAlreadyExists | Self::TokenAlreadyExists(_) => ErrorKind::AlreadyExists,
            Self::Unauthorized => ErrorKind::Unauthorized,
            Self::InvalidAmount(_)
            | Self::InvalidPercent(_)
            | Self::InvalidPrice
            | Self::InvalidInput(_) => ErrorKind::InvalidInput,
            Self::Store(_) => ErrorKind::StoreUnavailable,
        }
    }

    pub(crate) fn overflow() -> Self {
        Self::InvalidAmount("value out of range".to_string())
    }
}

impl From<PricingError> for LedgerError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::ZeroOutputPrice => Self::InvalidPrice,
            PricingError::Overflow => Self::overflow(),
        }
    }
}

impl From<AddressError> for LedgerError {
    fn from(err: AddressError) -> Self {
        Self::InvalidInput(err.to_string())
    }
}

/// Result alias for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;
