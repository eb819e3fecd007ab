//! Service error types with HTTP status code mapping.
//!
//! [`CatalogError`] is the central error type for the service. Each variant
//! maps to a specific HTTP status code and structured JSON error response.
//!
//! Marketplace failures are deliberately absent from this enum: the price
//! fetch degrades to synthetic data instead of failing the request, so the
//! only errors that reach HTTP callers are client-input problems, missing
//! rows, and exhausted-retry persistence failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "set not found: 10246-1",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges below).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category         | HTTP Status                |
/// |-----------|------------------|----------------------------|
/// | 1000–1999 | Validation/Auth  | 400 Bad Request / 401      |
/// | 2000–2999 | Not Found        | 404 Not Found              |
/// | 3000–3999 | Server           | 500 Internal Server Error  |
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// No catalog item exists for the given set number.
    #[error("set not found: {0}")]
    SetNotFound(String),

    /// A price refresh produced zero usable prices.
    #[error("no price data available for set {0}")]
    NoPriceData(String),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A protected endpoint was called without a valid API key.
    #[error("unauthorized: missing or invalid API key")]
    Unauthorized,

    /// Persistence layer failure after retry exhaustion.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::Unauthorized => 1002,
            Self::SetNotFound(_) => 2001,
            Self::NoPriceData(_) => 2002,
            Self::PersistenceError(_) => 3001,
            Self::Internal(_) => 3000,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::SetNotFound(_) | Self::NoPriceData(_) => StatusCode::NOT_FOUND,
            Self::PersistenceError(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        Self::PersistenceError(err.to_string())
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: None,
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn not_found_variants_map_to_404() {
        assert_eq!(
            CatalogError::SetNotFound("10246".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CatalogError::NoPriceData("10246".to_string()).status_code(),
            StatusCode::NOT_FOUND
        );
    }

    #[test]
    fn client_errors_map_to_4xx() {
        assert_eq!(
            CatalogError::InvalidRequest("missing set number".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CatalogError::Unauthorized.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn error_codes_are_unique() {
        let codes = [
            CatalogError::SetNotFound(String::new()).error_code(),
            CatalogError::NoPriceData(String::new()).error_code(),
            CatalogError::InvalidRequest(String::new()).error_code(),
            CatalogError::Unauthorized.error_code(),
            CatalogError::PersistenceError(String::new()).error_code(),
            CatalogError::Internal(String::new()).error_code(),
        ];
        let mut seen = std::collections::HashSet::new();
        for code in codes {
            assert!(seen.insert(code), "duplicate error code {code}");
        }
    }

    #[test]
    fn sqlx_errors_become_persistence_errors() {
        let err: CatalogError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, CatalogError::PersistenceError(_)));
    }
}
