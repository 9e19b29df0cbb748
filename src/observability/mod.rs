//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields)
//!     → logging.rs (subscriber, filter, fmt output)
//! ```
//!
//! # Design Decisions
//! - Request ID flows through every request-scoped log line
//! - Filter configurable via config and environment

pub mod logging;
