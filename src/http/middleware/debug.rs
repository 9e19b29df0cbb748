//! Verbose request/response dumping, enabled by the debug flag.

use axum::body::{Body, Bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::http::request::RequestIdExt;
use crate::service::codec::MAX_BODY_BYTES;

fn render_headers(headers: &HeaderMap) -> String {
    headers
        .iter()
        .map(|(name, value)| format!("{}: {}", name, value.to_str().unwrap_or("<binary>")))
        .collect::<Vec<_>>()
        .join(", ")
}

fn render_body(body: &Bytes) -> std::borrow::Cow<'_, str> {
    String::from_utf8_lossy(body)
}

/// Dump headers and bodies of every request and response.
///
/// Bodies are buffered, so this is for development only.
pub async fn debug_dump(req: Request, next: Next) -> Response {
    let request_id = req.request_id().to_string();
    let (parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to buffer request body");
            return (StatusCode::BAD_REQUEST, "request body too large").into_response();
        }
    };
    tracing::info!(
        request_id = %request_id,
        "> {} {} headers=[{}] body={}",
        parts.method,
        parts.uri,
        render_headers(&parts.headers),
        render_body(&bytes)
    );

    let response = next.run(Request::from_parts(parts, Body::from(bytes))).await;

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(request_id = %request_id, error = %e, "Failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };
    tracing::info!(
        request_id = %request_id,
        "< {} headers=[{}] body={}",
        parts.status,
        render_headers(&parts.headers),
        render_body(&bytes)
    );
    Response::from_parts(parts, Body::from(bytes))
}
