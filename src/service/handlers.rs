//! HTTP handlers for the foo service and their mounting.

use std::future::Future;
use std::sync::Arc;

use axum::http::{Method, StatusCode};
use axum::response::IntoResponse;

use crate::routing::{Handler, MuxError, Muxer, OptionsDispatcher};
use crate::security::CorsPolicy;
use crate::service::{codec, FooService};

/// Handler for a method taking and returning an integer.
fn unary<F, Fut>(name: &'static str, service: Arc<FooService>, method: F) -> Handler
where
    F: Fn(Arc<FooService>, i64) -> Fut + Copy + Send + Sync + 'static,
    Fut: Future<Output = i64> + Send + 'static,
{
    Handler::new(name, move |req| {
        let service = Arc::clone(&service);
        async move {
            let payload: i64 = codec::decode(req).await?;
            let result = method(service, payload).await;
            codec::encode(StatusCode::OK, &result)
        }
    })
}

pub fn foo1(service: Arc<FooService>) -> Handler {
    unary("Foo1", service, |s, p| async move { s.foo1(p).await })
}

pub fn foo2(service: Arc<FooService>) -> Handler {
    unary("Foo2", service, |s, p| async move { s.foo2(p).await })
}

pub fn foo3(service: Arc<FooService>) -> Handler {
    unary("Foo3", service, |s, p| async move { s.foo3(p).await })
}

/// Application-level options probe: 200 with an empty body.
pub fn foo_options(service: Arc<FooService>) -> Handler {
    Handler::new("FooOptions", move |_req| {
        let service = Arc::clone(&service);
        async move {
            service.foo_options().await;
            Ok(StatusCode::OK.into_response())
        }
    })
}

/// Mount every foo endpoint on `mux`.
///
/// CORS preflights and `fooOptions` share `OPTIONS /*` through a single
/// [`OptionsDispatcher`].
pub fn mount(mux: &mut Muxer, service: Arc<FooService>, cors: &CorsPolicy) -> Result<(), MuxError> {
    mux.register(Method::POST, "/foo1", cors.wrap(foo1(Arc::clone(&service))))?;
    mux.register(Method::POST, "/foo2", cors.wrap(foo2(Arc::clone(&service))))?;
    mux.register(Method::POST, "/foo3", cors.wrap(foo3(Arc::clone(&service))))?;

    let options = OptionsDispatcher::new(cors.preflight_handler(), foo_options(service));
    mux.register(Method::OPTIONS, "/*", options.into_handler())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::CorsConfig;
    use axum::body::Body;
    use axum::http::{header, Request};

    fn setup() -> (Muxer, Arc<FooService>) {
        let service = Arc::new(FooService::new());
        let cors = CorsPolicy::from_config(&CorsConfig::default()).unwrap();
        let mut mux = Muxer::new();
        mount(&mut mux, Arc::clone(&service), &cors).unwrap();
        (mux, service)
    }

    async fn body_string(res: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_mounts_are_listed() {
        let (mux, _) = setup();
        let mounts: Vec<_> = mux
            .mounts()
            .iter()
            .map(|m| format!("{} {} {}", m.name, m.method, m.pattern))
            .collect();
        assert_eq!(
            mounts,
            vec![
                "Foo1 POST /foo1",
                "Foo2 POST /foo2",
                "Foo3 POST /foo3",
                "CORS|FooOptions OPTIONS /*",
            ]
        );
    }

    #[test]
    fn test_mounting_cors_and_options_separately_conflicts() {
        let service = Arc::new(FooService::new());
        let cors = CorsPolicy::from_config(&CorsConfig::default()).unwrap();
        let mut mux = Muxer::new();
        mux.register(Method::OPTIONS, "/*", cors.preflight_handler())
            .unwrap();
        let err = mux
            .register(Method::OPTIONS, "/*", foo_options(service))
            .unwrap_err();
        assert!(matches!(err, MuxError::DuplicateRoute { .. }));
    }

    #[tokio::test]
    async fn test_foo_methods_return_zero() {
        let (mux, service) = setup();
        for path in ["/foo1", "/foo2", "/foo3"] {
            let req = Request::builder()
                .method("POST")
                .uri(path)
                .body(Body::from("5"))
                .unwrap();
            let res = mux.dispatch(req).await;
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(body_string(res).await, "0");
        }
        let calls = service.calls();
        assert_eq!((calls.foo1, calls.foo2, calls.foo3), (1, 1, 1));
    }

    #[tokio::test]
    async fn test_options_without_origin_reaches_application() {
        let (mux, service) = setup();
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/foo1")
            .body(Body::empty())
            .unwrap();
        let res = mux.dispatch(req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert!(!res.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN));
        assert_eq!(body_string(res).await, "");
        assert_eq!(service.calls().foo_options, 1);
    }

    #[tokio::test]
    async fn test_options_with_origin_is_preflight() {
        let (mux, service) = setup();
        let req = Request::builder()
            .method("OPTIONS")
            .uri("/foo1")
            .header("Origin", "https://app.example.com")
            .header("Access-Control-Request-Method", "POST")
            .body(Body::empty())
            .unwrap();
        let res = mux.dispatch(req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(
            res.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://app.example.com"
        );
        assert_eq!(service.calls().foo_options, 0);
    }
}
