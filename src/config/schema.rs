//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration (listen URL).
    pub listener: ListenerConfig,

    /// CORS allow-list.
    pub cors: CorsConfig,

    /// Graceful shutdown settings.
    pub shutdown: ShutdownConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Listen URL (e.g., "http://localhost:8080").
    pub url: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
        }
    }
}

impl ListenerConfig {
    /// `host:port` to bind, derived from the listen URL.
    pub fn bind_address(&self) -> Result<String, url::ParseError> {
        let url = Url::parse(&self.url)?;
        let host = url.host_str().ok_or(url::ParseError::EmptyHost)?;
        let port = url
            .port_or_known_default()
            .ok_or(url::ParseError::InvalidPort)?;
        Ok(format!("{}:{}", host, port))
    }
}

/// CORS configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct CorsConfig {
    /// Allowed origin pattern: `*`, an exact origin, or one `*` wildcard.
    pub origin: String,

    /// Request headers a preflight may announce.
    pub allow_headers: Vec<String>,

    /// Methods announced on preflight. Empty omits the header.
    pub allow_methods: Vec<String>,

    /// Response headers readable by scripts.
    pub expose_headers: Vec<String>,

    /// Preflight cache lifetime in seconds.
    pub max_age_secs: Option<u64>,

    /// Allow cookies and authorization headers.
    pub allow_credentials: bool,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            origin: "*.example.com".to_string(),
            allow_headers: vec!["X-Api-Version".to_string(), "X-Shared-Secret".to_string()],
            allow_methods: Vec::new(),
            expose_headers: Vec::new(),
            max_age_secs: Some(100),
            allow_credentials: true,
        }
    }
}

/// Graceful shutdown configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ShutdownConfig {
    /// Time in-flight requests get to finish, in seconds.
    pub timeout_secs: u64,
}

impl Default for ShutdownConfig {
    fn default() -> Self {
        Self { timeout_secs: 30 }
    }
}

impl ShutdownConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Dump request and response bodies.
    pub debug: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            debug: false,
        }
    }
}
