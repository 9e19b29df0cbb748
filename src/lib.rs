//! Foo service library.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod routing;
pub mod security;
pub mod service;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::{CompletionGroup, Shutdown};
pub use routing::{Classification, Handler, Muxer, OptionsDispatcher};
