//! Per-request service failures.

use axum::http::StatusCode;
use thiserror::Error;

/// Failures a handler can report. They are recovered per request: the
/// multiplexer turns them into a tagged error response and keeps serving.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request body could not be read.
    #[error("failed to read request body: {0}")]
    Body(#[source] axum::Error),

    /// The request body is not a valid payload.
    #[error("failed to decode request body: {0}")]
    Decode(#[source] serde_json::Error),

    /// The result could not be serialized.
    #[error("failed to encode response: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ServiceError {
    /// Status code sent along with the error body.
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Body(_) | ServiceError::Decode(_) => StatusCode::BAD_REQUEST,
            ServiceError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
