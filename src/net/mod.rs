//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming TCP connection
//!     → listener.rs (bind, accept, fatal vs per-connection errors)
//!     → connection.rs (one task per connection, graceful drain)
//!     → Hand off to HTTP layer
//!
//! Connection States:
//!     Accepted → Active → Draining → Closed (or Aborted after the deadline)
//! ```

pub mod connection;
pub mod listener;

pub use connection::{ConnectionId, Connections, DrainOutcome};
pub use listener::{Listener, ListenerError};
