//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the listen URL and value ranges
//! - Validate the CORS allow-list
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ServiceConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use axum::http::HeaderName;
use url::Url;

use crate::config::schema::ServiceConfig;
use crate::security::OriginPattern;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a configuration, collecting every problem.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    match Url::parse(&config.listener.url) {
        Ok(url) => {
            if url.scheme() != "http" {
                errors.push(ValidationError::new(
                    "listener.url",
                    format!("unsupported scheme {:?}, only http is served", url.scheme()),
                ));
            }
            if url.host_str().is_none() {
                errors.push(ValidationError::new("listener.url", "missing host"));
            }
        }
        Err(e) => errors.push(ValidationError::new(
            "listener.url",
            format!("invalid URL {:?}: {}", config.listener.url, e),
        )),
    }

    if OriginPattern::parse(&config.cors.origin).is_err() {
        errors.push(ValidationError::new(
            "cors.origin",
            format!(
                "invalid origin pattern {:?}, expected '*', an origin, or one '*' wildcard",
                config.cors.origin
            ),
        ));
    }

    for name in config
        .cors
        .allow_headers
        .iter()
        .chain(&config.cors.expose_headers)
    {
        if HeaderName::from_bytes(name.as_bytes()).is_err() {
            errors.push(ValidationError::new(
                "cors.allow_headers",
                format!("invalid header name {:?}", name),
            ));
        }
    }

    if config.shutdown.timeout_secs == 0 {
        errors.push(ValidationError::new(
            "shutdown.timeout_secs",
            "must be greater than zero",
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
