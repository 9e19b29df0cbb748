//! Typed request handlers.
//!
//! A [`Handler`] is the unit the multiplexer registers and invokes. It takes
//! ownership of the request (context such as the correlation id travels in
//! the request extensions) and resolves to either a response or a
//! [`ServiceError`] that the multiplexer turns into an error response.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::service::ServiceError;

/// Outcome of a handler invocation.
pub type HandlerResult = Result<Response, ServiceError>;

type HandlerFn = dyn Fn(Request<Body>) -> BoxFuture<'static, HandlerResult> + Send + Sync;

/// A named, cloneable, type-erased async request handler.
///
/// Cloning is cheap (two `Arc` bumps); handlers hold no multiplexer state.
#[derive(Clone)]
pub struct Handler {
    name: Arc<str>,
    call: Arc<HandlerFn>,
}

impl Handler {
    /// Wrap an async function as a handler.
    pub fn new<F, Fut>(name: impl Into<Arc<str>>, f: F) -> Self
    where
        F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = HandlerResult> + Send + 'static,
    {
        Self {
            name: name.into(),
            call: Arc::new(move |req| Box::pin(f(req))),
        }
    }

    /// Name used in mount logs.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Invoke the handler.
    pub fn call(&self, req: Request<Body>) -> BoxFuture<'static, HandlerResult> {
        (self.call)(req)
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler").field("name", &self.name).finish()
    }
}
