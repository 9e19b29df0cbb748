//! Middleware applied around the multiplexer.
//!
//! # Order (outermost first)
//! ```text
//! SetRequestId → PropagateRequestId → Trace → access_log → [debug_dump] → mux
//! ```
//! The correlation id is assigned before anything logs, so every line and
//! every error body for a request carries the same id.

pub mod debug;
pub mod logging;

use axum::middleware;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::http::request::{propagate_request_id_layer, set_request_id_layer};

pub use debug::debug_dump;
pub use logging::access_log;

/// Wrap `router` with the middleware chain.
pub fn apply(router: Router, debug: bool) -> Router {
    let router = if debug {
        router.layer(middleware::from_fn(debug_dump))
    } else {
        router
    };
    router
        .layer(middleware::from_fn(access_log))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(set_request_id_layer())
}
