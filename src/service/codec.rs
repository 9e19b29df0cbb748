//! JSON request decoding and response encoding.

use axum::body::Body;
use axum::http::{header, HeaderValue, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::service::ServiceError;

/// Largest request body the decoder will buffer.
pub const MAX_BODY_BYTES: usize = 64 * 1024;

/// Buffer the request body and decode it as JSON.
pub async fn decode<T: DeserializeOwned>(req: Request<Body>) -> Result<T, ServiceError> {
    let bytes = axum::body::to_bytes(req.into_body(), MAX_BODY_BYTES)
        .await
        .map_err(ServiceError::Body)?;
    serde_json::from_slice(&bytes).map_err(ServiceError::Decode)
}

/// Encode `value` as a JSON response with the given status.
pub fn encode<T: Serialize>(status: StatusCode, value: &T) -> Result<Response, ServiceError> {
    let body = serde_json::to_vec(value).map_err(ServiceError::Encode)?;
    Ok((
        status,
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )],
        body,
    )
        .into_response())
}
