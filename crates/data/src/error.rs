//! Storage errors.

/// Failure of the underlying record store.
///
/// These never carry client-facing meaning; the ledger reports them as an
/// opaque failure and logs the detail.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database rejected or failed a query.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    /// A stored row could not be mapped back to a domain record.
    #[error("corrupt record in {table}: {reason}")]
    Corrupt {
        /// Table or collection holding the row.
        table: &'static str,
        /// What failed to decode.
        reason: String,
    },
    /// The store cannot serve requests right now.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
