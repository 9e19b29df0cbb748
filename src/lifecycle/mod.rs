//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main):
//!     Load config → Validate → Build handlers → Spawn server (binds in its task)
//!
//! Running:
//!     accept loop ─── fatal error ──→ errors.rs (capacity-one channel) ──→ owner
//!     signals.rs ─── SIGINT/SIGTERM ──→ owner
//!
//! Shutdown:
//!     owner fires shutdown.rs → server stops accepting → drain (bounded)
//!     → completion.rs token released → owner exits
//! ```
//!
//! # Design Decisions
//! - Cancellation is explicit and one-way; nothing reads it from ambient state
//! - No retries: bind failure, accept failure, and drain timeout are terminal
//!   for a server instance
//! - Shutdown has timeout: forced close after deadline

pub mod completion;
pub mod errors;
pub mod shutdown;
pub mod signals;

pub use completion::{CompletionGroup, CompletionToken};
pub use errors::{error_channel, ErrorReceiver, ErrorSender};
pub use shutdown::Shutdown;
