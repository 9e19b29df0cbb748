//! HTTP server setup and lifecycle.
//!
//! # Responsibilities
//! - Build the handler set and wrap the multiplexer with middleware
//! - Bind the listener inside a dedicated task and run the accept loop
//! - Report fatal transport errors on the error channel
//! - Drain connections on shutdown within the configured deadline
//! - Release the completion token exactly once
//!
//! # States
//! ```text
//! Created ──bind ok──→ Listening ──shutdown signal──→ ShuttingDown ──drained──→ Stopped
//!    │                     │                                          ↑
//!    └──bind error─────────┼──────────────────────────────────────────┤
//!                          └──accept error──→ ShuttingDown ───────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use thiserror::Error;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::config::ServiceConfig;
use crate::http::middleware;
use crate::lifecycle::{CompletionGroup, CompletionToken, ErrorSender, Shutdown};
use crate::net::{Connections, DrainOutcome, Listener};
use crate::routing::{Mount, MuxError, Muxer};
use crate::security::{CorsError, CorsPolicy};
use crate::service::{self, FooService};

/// Errors that prevent a server from being built.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("invalid listen URL {url:?}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error(transparent)]
    Cors(#[from] CorsError),

    #[error(transparent)]
    Mux(#[from] MuxError),
}

/// Lifecycle state of a server instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    Created,
    Listening,
    ShuttingDown,
    Stopped,
}

/// Transport settings for a server.
#[derive(Debug, Clone)]
pub struct ServerSettings {
    /// `host:port` to bind.
    pub address: String,
    /// Time in-flight requests get after shutdown starts.
    pub shutdown_timeout: Duration,
    /// Dump requests and responses.
    pub debug: bool,
}

/// HTTP server for the foo service.
pub struct HttpServer {
    app: Router,
    mounts: Vec<Mount>,
    settings: ServerSettings,
}

impl HttpServer {
    /// Build the server with the foo handler set.
    pub fn new(config: &ServiceConfig, service: Arc<FooService>) -> Result<Self, SetupError> {
        let address = config
            .listener
            .bind_address()
            .map_err(|source| SetupError::InvalidUrl {
                url: config.listener.url.clone(),
                source,
            })?;
        let cors = CorsPolicy::from_config(&config.cors)?;

        let mut mux = Muxer::new();
        service::mount(&mut mux, service, &cors)?;

        Ok(Self::from_muxer(
            mux,
            ServerSettings {
                address,
                shutdown_timeout: config.shutdown.timeout(),
                debug: config.observability.debug,
            },
        ))
    }

    /// Build a server around an already populated multiplexer.
    pub fn from_muxer(mux: Muxer, settings: ServerSettings) -> Self {
        let mounts = mux.mounts().to_vec();
        let app = middleware::apply(mux.into_router(), settings.debug);
        Self {
            app,
            mounts,
            settings,
        }
    }

    pub fn mounts(&self) -> &[Mount] {
        &self.mounts
    }

    pub fn settings(&self) -> &ServerSettings {
        &self.settings
    }

    /// The fully wrapped router, for in-process use.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Start the server on its own task. The address is bound inside the
    /// task; a bind failure is reported on `errors`.
    pub fn spawn(
        self,
        shutdown: &Shutdown,
        completion: &CompletionGroup,
        errors: ErrorSender,
    ) -> ServerHandle {
        self.start(None, shutdown, completion, errors)
    }

    /// Start the server on an already bound listener.
    pub fn spawn_on(
        self,
        listener: Listener,
        shutdown: &Shutdown,
        completion: &CompletionGroup,
        errors: ErrorSender,
    ) -> ServerHandle {
        self.start(Some(listener), shutdown, completion, errors)
    }

    fn start(
        self,
        listener: Option<Listener>,
        shutdown: &Shutdown,
        completion: &CompletionGroup,
        errors: ErrorSender,
    ) -> ServerHandle {
        for mount in &self.mounts {
            tracing::info!(
                "HTTP {:?} mounted on {} {}",
                mount.name,
                mount.method,
                mount.pattern
            );
        }

        let (state_tx, state_rx) = watch::channel(ServerState::Created);
        let token = completion.acquire();
        let shutdown = shutdown.clone();
        let task = tokio::spawn(self.run(listener, shutdown, token, errors, state_tx));

        ServerHandle {
            state: state_rx,
            task,
        }
    }

    async fn run(
        self,
        listener: Option<Listener>,
        shutdown: Shutdown,
        _token: CompletionToken,
        errors: ErrorSender,
        state: watch::Sender<ServerState>,
    ) {
        let listener = match listener {
            Some(listener) => listener,
            None => match Listener::bind(&self.settings.address).await {
                Ok(listener) => listener,
                Err(e) => {
                    tracing::error!(error = %e, "HTTP server failed to start");
                    errors.report(e);
                    state.send_replace(ServerState::Stopped);
                    return;
                }
            },
        };
        let address = listener.local_addr();

        tracing::info!("HTTP server listening on {:?}", address.to_string());
        state.send_replace(ServerState::Listening);

        let mut connections = Connections::new(self.app);
        let failure = loop {
            tokio::select! {
                _ = shutdown.cancelled() => break None,
                accepted = listener.accept() => match accepted {
                    Ok((stream, peer)) => connections.serve(stream, peer),
                    Err(e) => break Some(e),
                },
                Some(()) = connections.reap(), if !connections.is_empty() => {}
            }
        };
        drop(listener);

        match failure {
            Some(e) => {
                tracing::error!(error = %e, "HTTP server accept loop failed");
                errors.report(e);
            }
            None => tracing::info!("shutting down HTTP server at {:?}", address.to_string()),
        }
        state.send_replace(ServerState::ShuttingDown);

        match connections.drain(self.settings.shutdown_timeout).await {
            DrainOutcome::Completed => {
                tracing::debug!(address = %address, "All connections drained");
            }
            DrainOutcome::TimedOut { aborted } => {
                tracing::warn!(
                    address = %address,
                    aborted,
                    timeout_secs = self.settings.shutdown_timeout.as_secs_f64(),
                    "Graceful shutdown timed out, connections forcibly closed"
                );
            }
        }

        state.send_replace(ServerState::Stopped);
        tracing::info!(address = %address, "HTTP server stopped");
    }
}

/// Handle to a running server.
#[derive(Debug)]
pub struct ServerHandle {
    state: watch::Receiver<ServerState>,
    task: JoinHandle<()>,
}

impl ServerHandle {
    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Wait until the server reaches `target` (or has already passed it).
    pub async fn reached(&mut self, target: ServerState) -> ServerState {
        let order = |s: ServerState| s as u8;
        match self.state.wait_for(|s| order(*s) >= order(target)).await {
            Ok(state) => *state,
            // The task dropped its sender, so it has finished.
            Err(_) => ServerState::Stopped,
        }
    }

    /// Wait for the server task to finish.
    pub async fn stopped(self) {
        if let Err(e) = self.task.await {
            tracing::error!(error = %e, "HTTP server task panicked");
        }
    }
}
