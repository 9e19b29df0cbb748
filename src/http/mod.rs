//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (accept loop, hyper auto HTTP/1.1 + HTTP/2)
//!     → middleware/ (request id, trace, access log, debug dump)
//!     → routing::Muxer
//!     → handler, or response.rs on failure
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{RequestIdExt, X_REQUEST_ID};
pub use server::{HttpServer, ServerHandle, ServerSettings, ServerState, SetupError};
