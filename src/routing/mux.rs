//! Request multiplexer.
//!
//! # Responsibilities
//! - Store (method, pattern) → handler registrations
//! - Reject duplicate registrations at setup time
//! - Look up the handler for a request, exact paths before wildcards
//! - Turn handler failures into tagged error responses
//!
//! # Design Decisions
//! - Mutated only during setup; frozen behind an `Arc` once converted into a
//!   router, so serving needs no locks
//! - Explicit 404 / 405 rather than a silent default

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use thiserror::Error;

use crate::http::request::RequestIdExt;
use crate::http::response::error_response;
use crate::routing::handler::Handler;
use crate::routing::matcher::{PathPattern, PatternError};

/// Setup-time routing errors.
#[derive(Debug, Error)]
pub enum MuxError {
    /// A handler is already registered for this exact method and pattern.
    #[error("{method} {pattern} is already mounted by {existing:?}, cannot mount {rejected:?}")]
    DuplicateRoute {
        method: Method,
        pattern: String,
        existing: String,
        rejected: String,
    },

    /// The path pattern could not be compiled.
    #[error("invalid pattern {pattern:?}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: PatternError,
    },
}

/// Record of a registered route, used for startup logging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub name: String,
    pub method: Method,
    pub pattern: String,
}

#[derive(Debug)]
struct Route {
    method: Method,
    pattern: PathPattern,
    handler: Handler,
}

/// Result of a route lookup.
#[derive(Debug)]
pub enum Lookup<'a> {
    Found(&'a Handler),
    MethodNotAllowed,
    NotFound,
}

/// Method + path multiplexer.
#[derive(Debug, Default)]
pub struct Muxer {
    routes: Vec<Route>,
    mounts: Vec<Mount>,
}

impl Muxer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `method` and `pattern`.
    ///
    /// Fails if the same (method, pattern) pair is already taken.
    pub fn register(
        &mut self,
        method: Method,
        pattern: &str,
        handler: Handler,
    ) -> Result<(), MuxError> {
        let compiled = PathPattern::parse(pattern).map_err(|source| MuxError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        if let Some(existing) = self
            .routes
            .iter()
            .find(|r| r.method == method && r.pattern == compiled)
        {
            return Err(MuxError::DuplicateRoute {
                method,
                pattern: compiled.to_string(),
                existing: existing.handler.name().to_string(),
                rejected: handler.name().to_string(),
            });
        }

        self.mounts.push(Mount {
            name: handler.name().to_string(),
            method: method.clone(),
            pattern: compiled.to_string(),
        });
        self.routes.push(Route {
            method,
            pattern: compiled,
            handler,
        });
        Ok(())
    }

    /// Registered routes in registration order.
    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    /// Find the most specific handler for a method and path.
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup<'_> {
        let best = self
            .routes
            .iter()
            .filter(|r| r.method == *method && r.pattern.matches(path))
            .max_by_key(|r| r.pattern.specificity());

        match best {
            Some(route) => Lookup::Found(&route.handler),
            None if self.routes.iter().any(|r| r.pattern.matches(path)) => {
                Lookup::MethodNotAllowed
            }
            None => Lookup::NotFound,
        }
    }

    /// Invoke the matching handler and encode any failure.
    pub async fn dispatch(&self, req: Request<Body>) -> Response {
        let handler = match self.lookup(req.method(), req.uri().path()) {
            Lookup::Found(handler) => handler.clone(),
            Lookup::MethodNotAllowed => return StatusCode::METHOD_NOT_ALLOWED.into_response(),
            Lookup::NotFound => return StatusCode::NOT_FOUND.into_response(),
        };

        let request_id = req.request_id().to_string();
        match handler.call(req).await {
            Ok(response) => response,
            Err(err) => error_response(&request_id, &err),
        }
    }

    /// Freeze the routing table and expose it as an axum router.
    pub fn into_router(self) -> Router {
        let mux = Arc::new(self);
        Router::new().fallback(move |req: Request<Body>| {
            let mux = Arc::clone(&mux);
            async move { mux.dispatch(req).await }
        })
    }
}
