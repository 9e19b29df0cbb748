//! Request identification.
//!
//! # Responsibilities
//! - Assign a correlation id (UUID v4) to every request before anything else
//!   runs, keeping one supplied by the client in `X-Request-Id`
//! - Echo the id back on the response
//! - Give handlers and the error encoder cheap access to the id
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - The id lives in the request extensions, not in a task-local

use axum::http::{HeaderName, Request};
use tower_http::request_id::{
    MakeRequestUuid, PropagateRequestIdLayer, RequestId, SetRequestIdLayer,
};

/// Header carrying the correlation id.
pub const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Placeholder used when a request was never tagged.
pub const UNKNOWN_REQUEST_ID: &str = "unknown";

/// Layer assigning the correlation id.
pub fn set_request_id_layer() -> SetRequestIdLayer<MakeRequestUuid> {
    SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid)
}

/// Layer copying the correlation id onto the response.
pub fn propagate_request_id_layer() -> PropagateRequestIdLayer {
    PropagateRequestIdLayer::new(X_REQUEST_ID)
}

/// Access to the correlation id of a request.
pub trait RequestIdExt {
    fn request_id(&self) -> &str;
}

impl<B> RequestIdExt for Request<B> {
    fn request_id(&self) -> &str {
        self.extensions()
            .get::<RequestId>()
            .map(RequestId::header_value)
            .or_else(|| self.headers().get(X_REQUEST_ID))
            .and_then(|v| v.to_str().ok())
            .unwrap_or(UNKNOWN_REQUEST_ID)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::HeaderValue;

    #[test]
    fn test_prefers_extension() {
        let mut req = Request::builder()
            .header("x-request-id", "from-header")
            .body(Body::empty())
            .unwrap();
        req.extensions_mut()
            .insert(RequestId::new(HeaderValue::from_static("from-extension")));
        assert_eq!(req.request_id(), "from-extension");
    }

    #[test]
    fn test_falls_back_to_header_then_unknown() {
        let req = Request::builder()
            .header("x-request-id", "from-header")
            .body(Body::empty())
            .unwrap();
        assert_eq!(req.request_id(), "from-header");

        let req = Request::builder().body(Body::empty()).unwrap();
        assert_eq!(req.request_id(), UNKNOWN_REQUEST_ID);
    }
}
