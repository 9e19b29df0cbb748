//! Connection tracking for graceful shutdown.
//!
//! # Responsibilities
//! - Serve each accepted connection on its own task (HTTP/1.1 and HTTP/2)
//! - Generate unique connection IDs for tracing
//! - Drain connections on shutdown within a deadline, then force-close the rest

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto;
use hyper_util::server::graceful::GracefulShutdown;
use hyper_util::service::TowerToHyperService;
use tokio::net::TcpStream;
use tokio::task::JoinSet;

/// Global atomic counter for connection IDs.
/// Relaxed ordering is enough, only uniqueness matters.
static CONNECTION_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub fn next() -> Self {
        Self(CONNECTION_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// How draining ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrainOutcome {
    /// Every connection finished its in-flight work.
    Completed,
    /// The deadline passed; this many connections were force-closed.
    TimedOut { aborted: usize },
}

/// The set of live connections of one server.
pub struct Connections {
    app: Router,
    builder: auto::Builder<TokioExecutor>,
    graceful: GracefulShutdown,
    tasks: JoinSet<()>,
}

impl Connections {
    pub fn new(app: Router) -> Self {
        Self {
            app,
            builder: auto::Builder::new(TokioExecutor::new()),
            graceful: GracefulShutdown::new(),
            tasks: JoinSet::new(),
        }
    }

    /// Serve `stream` on a new task.
    pub fn serve(&mut self, stream: TcpStream, peer: SocketAddr) {
        let id = ConnectionId::next();
        let service = TowerToHyperService::new(self.app.clone());
        let conn = self
            .builder
            .serve_connection_with_upgrades(TokioIo::new(stream), service)
            .into_owned();
        let conn = self.graceful.watch(conn);

        tracing::trace!(connection_id = %id, peer_addr = %peer, "Connection accepted");
        self.tasks.spawn(async move {
            if let Err(e) = conn.await {
                tracing::debug!(connection_id = %id, error = %e, "Connection error");
            }
            tracing::trace!(connection_id = %id, "Connection closed");
        });
    }

    /// Number of connection tasks not yet reaped.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Reap one finished connection task.
    pub async fn reap(&mut self) -> Option<()> {
        self.tasks.join_next().await.map(|_| ())
    }

    /// Ask every connection to finish its in-flight request and close. After
    /// `timeout`, abort whatever is left.
    pub async fn drain(self, timeout: Duration) -> DrainOutcome {
        let Self {
            graceful,
            mut tasks,
            ..
        } = self;

        match tokio::time::timeout(timeout, graceful.shutdown()).await {
            Ok(()) => {
                while tasks.join_next().await.is_some() {}
                DrainOutcome::Completed
            }
            Err(_) => {
                // Finished tasks would be over-counted as aborted.
                while let Some(_finished) = tasks.try_join_next() {}
                let aborted = tasks.len();
                tasks.abort_all();
                while tasks.join_next().await.is_some() {}
                DrainOutcome::TimedOut { aborted }
            }
        }
    }
}
