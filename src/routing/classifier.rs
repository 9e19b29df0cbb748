//! Origin classification for `OPTIONS` requests.
//!
//! Browsers always send `Origin` on a CORS preflight. An application-level
//! options call made directly (health checks, same-origin tooling, non-browser
//! clients) does not. Header presence is the whole decision: neither the path
//! nor the body is inspected.

use std::fmt;

use axum::http::{header, HeaderMap, Method, Request};

/// Which logical handler a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Cross-origin preflight: `OPTIONS` with a non-empty `Origin`.
    Preflight,
    /// Anything else, including `OPTIONS` without `Origin`.
    Application,
}

impl Classification {
    pub fn as_str(&self) -> &'static str {
        match self {
            Classification::Preflight => "preflight",
            Classification::Application => "application",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a request.
pub fn classify<B>(req: &Request<B>) -> Classification {
    classify_parts(req.method(), req.headers())
}

/// Classify from method and headers alone.
pub fn classify_parts(method: &Method, headers: &HeaderMap) -> Classification {
    let has_origin = headers
        .get(header::ORIGIN)
        .map(|origin| !origin.is_empty())
        .unwrap_or(false);

    if method == Method::OPTIONS && has_origin {
        Classification::Preflight
    } else {
        Classification::Application
    }
}
