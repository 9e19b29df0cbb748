//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (method, path, headers)
//!     → mux.rs (route lookup, exact before wildcard)
//!     → matcher.rs (evaluate path patterns)
//!     → handler for an exact route, or
//!     → dispatcher.rs for the wildcard OPTIONS route
//!         → classifier.rs (Origin header present?)
//!         → CORS handler | application handler
//!
//! Route Registration (at startup):
//!     register(method, pattern, handler)
//!     → duplicate (method, pattern) rejected
//!     → frozen as immutable router
//! ```
//!
//! # Design Decisions
//! - Routes registered at startup, immutable at runtime
//! - No regex in hot path (exact and prefix matching only)
//! - Classification is a pure function of method and headers

pub mod classifier;
pub mod dispatcher;
pub mod handler;
pub mod matcher;
pub mod mux;

pub use classifier::{classify, Classification};
pub use dispatcher::OptionsDispatcher;
pub use handler::{Handler, HandlerResult};
pub use mux::{Mount, MuxError, Muxer};
