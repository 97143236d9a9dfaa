//! Error types for the REST API and the upstream providers.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

#[cfg(test)]
mod tests;

/// API error response body.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error message.
    pub error: String,
    /// Error code.
    pub code: String,
}

/// API error types.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The `type` query parameter is not a known query kind.
    #[error("Invalid type: {0}. Use one of chain, 0dte, unusual, snapshot, sparkline, pcr")]
    InvalidType(String),

    /// The query string could not be decoded.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            ApiError::InvalidType(_) => (StatusCode::BAD_REQUEST, "INVALID_TYPE"),
            ApiError::InvalidQuery(_) => (StatusCode::BAD_REQUEST, "INVALID_QUERY"),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            code: code.to_string(),
        });

        (status, body).into_response()
    }
}

/// Failure of a single upstream provider call.
///
/// Provider clients never let these escape as panics; handlers match on them
/// and degrade to synthetic data.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// No credential is configured for the provider.
    #[error("provider credential is not configured")]
    MissingCredential,

    /// The request could not be sent or the connection failed.
    #[error("transport error: {0}")]
    Transport(String),

    /// The provider did not answer before the deadline.
    #[error("request timed out")]
    Timeout,

    /// The provider answered with a non-success status.
    #[error("provider returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The request URL could not be built.
    #[error("invalid request url: {0}")]
    InvalidUrl(String),

    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else if err.is_decode() {
            ProviderError::Decode(err.to_string())
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}
