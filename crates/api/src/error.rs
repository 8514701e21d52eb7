//! API error type and its HTTP mapping.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use pioswap_domain::value_objects::AddressError;
use pioswap_ledger::{ErrorKind, LedgerError};
use serde_json::json;
use tracing::error;

/// Errors surfaced by request handlers.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Malformed path, query or body.
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// Status code for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Ledger(err) => match err.kind() {
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::AlreadyExists | ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
                ErrorKind::Unauthorized => StatusCode::FORBIDDEN,
                ErrorKind::StoreUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl From<AddressError> for ApiError {
    fn from(err: AddressError) -> Self {
        Self::BadRequest(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Ledger(LedgerError::Store(source)) = &self {
            error!(error = %source, "Store operation failed");
        }
        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pioswap_data::StoreError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(LedgerError::TokensNotFound).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(LedgerError::PoolAlreadyExists).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LedgerError::Unauthorized).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            ApiError::from(LedgerError::InvalidPrice).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(LedgerError::Store(StoreError::Unavailable("down".into()))).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_errors_are_opaque() {
        let err = ApiError::from(LedgerError::Store(StoreError::Unavailable(
            "postgres://user:secret@db".into(),
        )));
        assert_eq!(err.to_string(), "operation failed");
    }
}
