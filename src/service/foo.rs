//! The foo service.
//!
//! The methods log the call and return zero values.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[derive(Debug, Default)]
struct Counters {
    foo1: AtomicU64,
    foo2: AtomicU64,
    foo3: AtomicU64,
    foo_options: AtomicU64,
}

/// Snapshot of how often each method ran.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub foo1: u64,
    pub foo2: u64,
    pub foo3: u64,
    pub foo_options: u64,
}

/// Business methods exposed over HTTP.
#[derive(Debug, Default, Clone)]
pub struct FooService {
    counters: Arc<Counters>,
}

impl FooService {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn foo1(&self, payload: i64) -> i64 {
        self.counters.foo1.fetch_add(1, Ordering::Relaxed);
        tracing::info!(payload, "foo.foo1");
        0
    }

    pub async fn foo2(&self, payload: i64) -> i64 {
        self.counters.foo2.fetch_add(1, Ordering::Relaxed);
        tracing::info!(payload, "foo.foo2");
        0
    }

    pub async fn foo3(&self, payload: i64) -> i64 {
        self.counters.foo3.fetch_add(1, Ordering::Relaxed);
        tracing::info!(payload, "foo.foo3");
        0
    }

    /// Application-level options probe.
    pub async fn foo_options(&self) {
        self.counters.foo_options.fetch_add(1, Ordering::Relaxed);
        tracing::info!("foo.fooOptions");
    }

    pub fn calls(&self) -> CallCounts {
        CallCounts {
            foo1: self.counters.foo1.load(Ordering::Relaxed),
            foo2: self.counters.foo2.load(Ordering::Relaxed),
            foo3: self.counters.foo3.load(Ordering::Relaxed),
            foo_options: self.counters.foo_options.load(Ordering::Relaxed),
        }
    }
}
