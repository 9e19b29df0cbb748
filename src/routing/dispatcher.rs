//! Dual-path `OPTIONS` dispatcher.
//!
//! The multiplexer holds at most one handler per (method, pattern). CORS and
//! the application's own options method both want `OPTIONS`, so only this
//! dispatcher is registered and it fans out per request.

use axum::body::Body;
use axum::http::Request;
use futures_util::future::BoxFuture;

use crate::routing::classifier::{classify, Classification};
use crate::routing::handler::{Handler, HandlerResult};

/// Routes one physical `OPTIONS` route to the CORS or the application handler.
#[derive(Debug, Clone)]
pub struct OptionsDispatcher {
    cors: Handler,
    application: Handler,
}

impl OptionsDispatcher {
    pub fn new(cors: Handler, application: Handler) -> Self {
        Self { cors, application }
    }

    /// Pick the handler for a request without invoking it.
    pub fn select(&self, req: &Request<Body>) -> (Classification, &Handler) {
        match classify(req) {
            Classification::Preflight => (Classification::Preflight, &self.cors),
            Classification::Application => (Classification::Application, &self.application),
        }
    }

    /// Invoke exactly one of the two handlers. Errors pass through untouched.
    pub fn dispatch(&self, req: Request<Body>) -> BoxFuture<'static, HandlerResult> {
        let (classification, handler) = self.select(&req);
        match classification {
            Classification::Preflight => {
                tracing::debug!(
                    path = %req.uri().path(),
                    handler = handler.name(),
                    "Handling OPTIONS as a CORS preflight request"
                );
            }
            Classification::Application => {
                tracing::debug!(
                    path = %req.uri().path(),
                    handler = handler.name(),
                    "No Origin header present, routing OPTIONS to application handler"
                );
            }
        }
        handler.call(req)
    }

    /// Collapse into a single handler suitable for registration.
    pub fn into_handler(self) -> Handler {
        let name = format!("{}|{}", self.cors.name(), self.application.name());
        Handler::new(name, move |req| self.dispatch(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::ServiceError;
    use axum::http::{Method, StatusCode};
    use axum::response::IntoResponse;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting(name: &'static str, counter: Arc<AtomicUsize>, status: StatusCode) -> Handler {
        Handler::new(name, move |_req| {
            let counter = counter.clone();
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(status.into_response())
            }
        })
    }

    fn options(origin: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(Method::OPTIONS).uri("/foo1");
        if let Some(origin) = origin {
            builder = builder.header("Origin", origin);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn setup() -> (OptionsDispatcher, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let cors_calls = Arc::new(AtomicUsize::new(0));
        let app_calls = Arc::new(AtomicUsize::new(0));
        let dispatcher = OptionsDispatcher::new(
            counting("CORS", cors_calls.clone(), StatusCode::NO_CONTENT),
            counting("FooOptions", app_calls.clone(), StatusCode::OK),
        );
        (dispatcher, cors_calls, app_calls)
    }

    #[tokio::test]
    async fn test_origin_goes_to_cors_only() {
        let (dispatcher, cors_calls, app_calls) = setup();
        let res = dispatcher
            .dispatch(options(Some("https://app.example.com")))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        assert_eq!(cors_calls.load(Ordering::SeqCst), 1);
        assert_eq!(app_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_or_empty_origin_goes_to_application_only() {
        let (dispatcher, cors_calls, app_calls) = setup();
        dispatcher.dispatch(options(None)).await.unwrap();
        dispatcher.dispatch(options(Some(""))).await.unwrap();
        assert_eq!(cors_calls.load(Ordering::SeqCst), 0);
        assert_eq!(app_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_exactly_one_handler_per_request() {
        let (dispatcher, cors_calls, app_calls) = setup();
        let handler = dispatcher.into_handler();
        let origins = [
            None,
            Some(""),
            Some("https://app.example.com"),
            Some("null"),
            Some("https://elsewhere.test"),
        ];
        for (i, origin) in origins.iter().enumerate() {
            handler.call(options(*origin)).await.unwrap();
            let total = cors_calls.load(Ordering::SeqCst) + app_calls.load(Ordering::SeqCst);
            assert_eq!(total, i + 1);
        }
        assert_eq!(cors_calls.load(Ordering::SeqCst), 3);
        assert_eq!(app_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failure_propagates_unchanged() {
        let failing = Handler::new("FooOptions", |_req| async {
            Err(ServiceError::Encode(
                serde_json::from_str::<i64>("x").unwrap_err(),
            ))
        });
        let dispatcher = OptionsDispatcher::new(
            counting("CORS", Arc::new(AtomicUsize::new(0)), StatusCode::OK),
            failing,
        );
        let err = dispatcher.dispatch(options(None)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Encode(_)));
    }

    #[test]
    fn test_handler_name_combines_both() {
        let (dispatcher, _, _) = setup();
        assert_eq!(dispatcher.into_handler().name(), "CORS|FooOptions");
    }
}
