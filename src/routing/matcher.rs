//! Path pattern matching.
//!
//! # Responsibilities
//! - Parse route patterns (exact paths and `/*` prefix wildcards)
//! - Match request paths against a pattern
//! - Rank patterns so that the most specific match wins
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - A wildcard is only allowed as the final segment (`/api/*`)
//! - No regex to guarantee O(n) matching

use std::fmt;

use thiserror::Error;

/// Reason a pattern was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Pattern does not start with `/`.
    #[error("pattern must start with '/'")]
    NotAbsolute,
    /// `*` appears somewhere other than a trailing `/*` segment.
    #[error("'*' is only allowed as a trailing '/*' segment")]
    MisplacedWildcard,
}

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathPattern {
    /// Matches exactly one path.
    Exact(String),
    /// Matches every path starting with the stored prefix (always ends in `/`).
    Prefix(String),
}

impl PathPattern {
    /// Compile a pattern such as `/foo1`, `/*` or `/api/*`.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        if !pattern.starts_with('/') {
            return Err(PatternError::NotAbsolute);
        }
        match pattern.strip_suffix('*') {
            Some(prefix) if prefix.ends_with('/') && !prefix.contains('*') => {
                Ok(PathPattern::Prefix(prefix.to_string()))
            }
            Some(_) => Err(PatternError::MisplacedWildcard),
            None if pattern.contains('*') => Err(PatternError::MisplacedWildcard),
            None => Ok(PathPattern::Exact(pattern.to_string())),
        }
    }

    /// Returns true if `path` is covered by this pattern.
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(expected) => path == expected,
            PathPattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }

    /// Higher is more specific. Exact paths beat any wildcard, longer
    /// prefixes beat shorter ones.
    pub fn specificity(&self) -> usize {
        match self {
            PathPattern::Exact(_) => usize::MAX,
            PathPattern::Prefix(prefix) => prefix.len(),
        }
    }

    pub fn is_wildcard(&self) -> bool {
        matches!(self, PathPattern::Prefix(_))
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathPattern::Exact(path) => write!(f, "{}", path),
            PathPattern::Prefix(prefix) => write!(f, "{}*", prefix),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_pattern() {
        let pattern = PathPattern::parse("/foo1").unwrap();
        assert!(pattern.matches("/foo1"));
        assert!(!pattern.matches("/foo1/"));
        assert!(!pattern.matches("/FOO1")); // Case sensitive
        assert!(!pattern.is_wildcard());
    }

    #[test]
    fn test_root_wildcard_matches_everything() {
        let pattern = PathPattern::parse("/*").unwrap();
        assert!(pattern.matches("/"));
        assert!(pattern.matches("/foo1"));
        assert!(pattern.matches("/a/b/c"));
        assert_eq!(pattern.to_string(), "/*");
    }

    #[test]
    fn test_nested_wildcard() {
        let pattern = PathPattern::parse("/api/*").unwrap();
        assert!(pattern.matches("/api/v1"));
        assert!(!pattern.matches("/apiv1"));
        assert!(!pattern.matches("/other"));
    }

    #[test]
    fn test_rejects_bad_patterns() {
        assert_eq!(PathPattern::parse("foo"), Err(PatternError::NotAbsolute));
        assert_eq!(PathPattern::parse("/a*"), Err(PatternError::MisplacedWildcard));
        assert_eq!(PathPattern::parse("/*/b"), Err(PatternError::MisplacedWildcard));
        assert_eq!(PathPattern::parse("/*/*"), Err(PatternError::MisplacedWildcard));
    }

    #[test]
    fn test_pattern_error_is_std_error() {
        let err: Box<dyn std::error::Error> = Box::new(PatternError::NotAbsolute);
        assert_eq!(err.to_string(), "pattern must start with '/'");
        assert_eq!(
            PatternError::MisplacedWildcard.to_string(),
            "'*' is only allowed as a trailing '/*' segment"
        );
    }

    #[test]
    fn test_specificity_ordering() {
        let exact = PathPattern::parse("/api/v1").unwrap();
        let nested = PathPattern::parse("/api/*").unwrap();
        let root = PathPattern::parse("/*").unwrap();
        assert!(exact.specificity() > nested.specificity());
        assert!(nested.specificity() > root.specificity());
    }
}
