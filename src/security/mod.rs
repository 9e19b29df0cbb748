//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! OPTIONS with Origin (preflight)
//!     → cors.rs (origin allow-list, CorsLayer answers the preflight)
//!
//! Business request with Origin
//!     → business handler
//!     → the same CorsLayer decorates the response for allowed origins
//! ```

pub mod cors;

pub use cors::{CorsError, CorsPolicy, OriginPattern};
