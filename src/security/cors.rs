//! Cross-origin resource sharing.
//!
//! # Responsibilities
//! - Match request origins against the configured allow-list pattern
//! - Answer preflight requests through a `tower_http` [`CorsLayer`]
//! - Decorate simple cross-origin responses from business handlers
//!
//! # Design Decisions
//! - Allowed origins are reflected back, never answered with `*`, so that
//!   credentials stay usable
//! - An origin outside the allow-list still gets a 200, just without
//!   `Access-Control-Allow-Origin`; the browser enforces the refusal
//! - One layer is built at startup and shared by every route

use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::request::Parts;
use axum::http::{header, HeaderName, HeaderValue, Method, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tower::{service_fn, Layer, ServiceExt};
use tower_http::cors::{AllowCredentials, AllowHeaders, AllowMethods, AllowOrigin, CorsLayer, ExposeHeaders};

use crate::config::schema::CorsConfig;
use crate::routing::Handler;

/// Errors building a policy from configuration.
#[derive(Debug, Error)]
pub enum CorsError {
    #[error("invalid origin pattern {0:?}")]
    InvalidOrigin(String),

    #[error("invalid header name {0:?}")]
    InvalidHeader(String),

    #[error("invalid method {0:?}")]
    InvalidMethod(String),
}

/// An origin allow-list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPattern {
    /// `*`
    Any,
    /// No wildcard; origin must be identical.
    Exact(String),
    /// One `*`; origin must start with `prefix` and end with `suffix`.
    Wildcard { prefix: String, suffix: String },
}

impl OriginPattern {
    pub fn parse(pattern: &str) -> Result<Self, CorsError> {
        if pattern.is_empty() {
            return Err(CorsError::InvalidOrigin(pattern.to_string()));
        }
        if pattern == "*" {
            return Ok(OriginPattern::Any);
        }
        match pattern.split_once('*') {
            None => Ok(OriginPattern::Exact(pattern.to_string())),
            Some((_, rest)) if rest.contains('*') => {
                Err(CorsError::InvalidOrigin(pattern.to_string()))
            }
            Some((prefix, suffix)) => Ok(OriginPattern::Wildcard {
                prefix: prefix.to_string(),
                suffix: suffix.to_string(),
            }),
        }
    }

    pub fn matches(&self, origin: &str) -> bool {
        match self {
            OriginPattern::Any => true,
            OriginPattern::Exact(expected) => origin == expected,
            OriginPattern::Wildcard { prefix, suffix } => {
                origin.len() >= prefix.len() + suffix.len()
                    && origin.starts_with(prefix.as_str())
                    && origin.ends_with(suffix.as_str())
            }
        }
    }

    /// Match a raw `Origin` header value. Empty and non-UTF-8 values never match.
    pub fn matches_header(&self, origin: &HeaderValue) -> bool {
        origin
            .to_str()
            .is_ok_and(|text| !text.is_empty() && self.matches(text))
    }
}

/// Compiled CORS policy.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    layer: CorsLayer,
}

impl CorsPolicy {
    pub fn from_config(config: &CorsConfig) -> Result<Self, CorsError> {
        let origin = Arc::new(OriginPattern::parse(&config.origin)?);

        let allow_origin = {
            let origin = Arc::clone(&origin);
            AllowOrigin::predicate(move |value: &HeaderValue, _: &Parts| {
                origin.matches_header(value)
            })
        };

        let mut layer = CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_headers(AllowHeaders::list(header_names(&config.allow_headers)?))
            .allow_methods(AllowMethods::list(methods(&config.allow_methods)?))
            .expose_headers(ExposeHeaders::list(header_names(&config.expose_headers)?))
            .vary([header::ORIGIN]);

        if let Some(secs) = config.max_age_secs {
            layer = layer.max_age(Duration::from_secs(secs));
        }
        if config.allow_credentials {
            layer = layer.allow_credentials(AllowCredentials::predicate(
                move |value: &HeaderValue, _: &Parts| origin.matches_header(value),
            ));
        }

        Ok(Self { layer })
    }

    /// Handler answering CORS preflights.
    pub fn preflight_handler(&self) -> Handler {
        let layer = self.layer.clone();
        Handler::new("CORS", move |req: Request<Body>| {
            let cors = layer.layer(service_fn(|_req: Request<Body>| async {
                Ok::<Response, Infallible>(StatusCode::OK.into_response())
            }));
            async move {
                let response = cors.oneshot(req).await.unwrap_or_else(|never| match never {});
                Ok(response)
            }
        })
    }

    /// Wrap a business handler so allowed cross-origin callers get CORS
    /// headers on its successful responses.
    pub fn wrap(&self, handler: Handler) -> Handler {
        let layer = self.layer.clone();
        let name = handler.name().to_string();
        Handler::new(name, move |req: Request<Body>| {
            let handler = handler.clone();
            layer
                .layer(service_fn(move |req: Request<Body>| handler.call(req)))
                .oneshot(req)
        })
    }
}

fn header_names(names: &[String]) -> Result<Vec<HeaderName>, CorsError> {
    names
        .iter()
        .map(|name| {
            HeaderName::from_bytes(name.as_bytes()).map_err(|_| CorsError::InvalidHeader(name.clone()))
        })
        .collect()
}

fn methods(names: &[String]) -> Result<Vec<Method>, CorsError> {
    names
        .iter()
        .map(|name| {
            Method::from_bytes(name.as_bytes()).map_err(|_| CorsError::InvalidMethod(name.clone()))
        })
        .collect()
}
