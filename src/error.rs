//! Catalog error types with HTTP status code mapping.
//!
//! [`CatalogError`] is the central error type for the service. Every
//! variant resolves to a well-formed JSON response; nothing escapes to
//! the framework as an unhandled failure.

use axum::http::StatusCode;
use axum::http::header::ALLOW;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

/// Structured JSON error response body.
///
/// ```json
/// {
///   "error": "Failed to fetch products",
///   "message": "An error occurred while retrieving products",
///   "details": "query failed after 3 attempts: connection reset"
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Short error category.
    pub error: String,
    /// Human-readable message safe for any client.
    pub message: String,
    /// Underlying cause. Only present outside production.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CatalogError {
    /// A single fetch attempt failed; retryable.
    #[error("query error: {0}")]
    Query(String),

    /// A single fetch attempt exceeded the per-attempt timeout; retryable.
    #[error("query timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// All fetch attempts failed.
    #[error("query failed after {attempts} attempts: {reason}")]
    QueryFailed {
        /// Number of attempts made.
        attempts: u32,
        /// Message from the last failed attempt.
        reason: String,
    },

    /// Query-string validation failed (strict parsing only).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The endpoint is read-only.
    #[error("method not allowed: the products dataset is read-only")]
    MethodNotAllowed,

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<sqlx::Error> for CatalogError {
    fn from(err: sqlx::Error) -> Self {
        Self::Query(err.to_string())
    }
}

impl CatalogError {
    /// Returns `true` for failures the executor retries.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Query(_) | Self::Timeout(_))
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Self::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            Self::Query(_) | Self::Timeout(_) | Self::QueryFailed { .. } | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Builds the JSON body. `expose_details` controls whether the
    /// underlying message is attached.
    #[must_use]
    pub fn to_body(&self, expose_details: bool) -> ErrorResponse {
        let (error, message) = match self {
            Self::InvalidRequest(msg) => ("Invalid request", msg.clone()),
            Self::MethodNotAllowed => (
                "Method not allowed",
                "The products dataset is read-only".to_string(),
            ),
            Self::Query(_) | Self::Timeout(_) | Self::QueryFailed { .. } | Self::Internal(_) => (
                "Failed to fetch products",
                "An error occurred while retrieving products".to_string(),
            ),
        };
        let details = (expose_details && self.status_code().is_server_error())
            .then(|| self.to_string());
        ErrorResponse {
            error: error.to_string(),
            message,
            details,
        }
    }

    /// Converts into a response, attaching details only when allowed.
    #[must_use]
    pub fn into_response_with(self, expose_details: bool) -> Response {
        let status = self.status_code();
        let mut response = axum::Json(self.to_body(expose_details)).into_response();
        *response.status_mut() = status;
        if matches!(self, Self::MethodNotAllowed) {
            response
                .headers_mut()
                .insert(ALLOW, axum::http::HeaderValue::from_static("GET"));
        }
        response
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        self.into_response_with(false)
    }
}
