//! Error responses.
//!
//! A failed request answers `[<request id>] encoding: <message>` and the same
//! id is logged, so an operator can find the server-side entry for any error
//! a user reports.

use axum::http::{header, HeaderValue};
use axum::response::{IntoResponse, Response};

use crate::service::ServiceError;

/// Write and log a tagged error.
pub fn error_response(request_id: &str, err: &ServiceError) -> Response {
    tracing::error!(request_id = %request_id, "[{}] ERROR: {}", request_id, err);
    let body = format!("[{}] encoding: {}", request_id, err);
    (
        err.status(),
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )],
        body,
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_body_is_tagged_with_request_id() {
        let err = ServiceError::Encode(serde_json::from_str::<i64>("{").unwrap_err());
        let expected = format!("[abc-123] encoding: {}", err);

        let res = error_response("abc-123", &err);
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        assert_eq!(String::from_utf8(body.to_vec()).unwrap(), expected);
    }
}
