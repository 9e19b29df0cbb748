//! Foo service: business methods, JSON codec, and the handler set.

pub mod codec;
pub mod error;
pub mod foo;
pub mod handlers;

pub use error::ServiceError;
pub use foo::{CallCounts, FooService};
pub use handlers::mount;
