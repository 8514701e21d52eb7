use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of event recorded in the transaction log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// A trade of `token0` for `token1`.
    Swap,
    /// Liquidity deposited into a pool.
    Add,
    /// Liquidity withdrawn from a pool.
    Remove,
}

impl TransactionType {
    /// Lower-case wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Swap => "swap",
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

impl FromStr for TransactionType {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "swap" => Ok(Self::Swap),
            "add" => Ok(Self::Add),
            "remove" => Ok(Self::Remove),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settlement status of a logged transaction.
///
/// The ledger only ever writes `Confirmed`; the other states exist for
/// records produced by an external chain watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    #[default]
    Confirmed,
    Failed,
}

impl TransactionStatus {
    /// Lower-case wire name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for TransactionStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "failed" => Ok(Self::Failed),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored enum value that no variant matches.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_type_parsing() {
        for kind in [TransactionType::Swap, TransactionType::Add, TransactionType::Remove] {
            assert_eq!(kind.as_str().parse::<TransactionType>(), Ok(kind));
        }
        assert!("deposit".parse::<TransactionType>().is_err());
    }

    #[test]
    fn test_status_default_is_confirmed() {
        assert_eq!(TransactionStatus::default(), TransactionStatus::Confirmed);
    }
}
