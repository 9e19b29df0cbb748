//! Foo service
//!
//! Serves the foo methods over HTTP. CORS preflights and the application's
//! own `OPTIONS` method share one wildcard route; a dispatcher tells them
//! apart by the `Origin` header.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ net listener ──▶ middleware ──▶ routing mux ──┬──▶ POST /foo1..3
//!                     (accept loop)    request id                   │
//!                                      trace, log                   └──▶ OPTIONS /*
//!                                                                         │
//!                                                              options dispatcher
//!                                                                 │            │
//!                                                           Origin set    no Origin
//!                                                                 ▼            ▼
//!                                                               CORS      fooOptions
//!
//!     lifecycle: signal ──▶ shutdown ──▶ drain (bounded) ──▶ completion ──▶ exit
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use foo_service::config::{read_config, validate_config, ConfigError, ServiceConfig};
use foo_service::http::HttpServer;
use foo_service::lifecycle::{error_channel, signals, CompletionGroup, Shutdown};
use foo_service::observability::logging;
use foo_service::service::FooService;

#[derive(Parser)]
#[command(name = "foo-service")]
#[command(about = "Foo service HTTP server", long_about = None)]
struct Cli {
    /// Listen URL, e.g. http://localhost:8080
    #[arg(short, long)]
    url: Option<String>,

    /// Log request and response details
    #[arg(short, long)]
    debug: bool,

    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seconds in-flight requests get to finish on shutdown
    #[arg(long)]
    shutdown_timeout_secs: Option<u64>,
}

impl Cli {
    /// File values first, then flag overrides; the merged result is
    /// validated once.
    fn into_config(self) -> Result<ServiceConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ServiceConfig::default(),
        };
        if let Some(url) = self.url {
            config.listener.url = url;
        }
        if self.debug {
            config.observability.debug = true;
        }
        if let Some(secs) = self.shutdown_timeout_secs {
            config.shutdown.timeout_secs = secs;
        }
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Cli::parse().into_config()?;

    logging::init(&config.observability);

    tracing::info!("foo-service v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        url = %config.listener.url,
        cors_origin = %config.cors.origin,
        shutdown_timeout_secs = config.shutdown.timeout_secs,
        debug = config.observability.debug,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    let completion = CompletionGroup::new();
    let (errors, mut fatal) = error_channel();

    let server = HttpServer::new(&config, Arc::new(FooService::new()))?;
    let handle = server.spawn(&shutdown, &completion, errors);

    let failure = tokio::select! {
        err = fatal.recv() => err,
        signal = signals::wait_for_signal() => {
            match signal {
                Ok(name) => tracing::info!(signal = name, "exiting"),
                Err(e) => tracing::error!(error = %e, "Failed to listen for shutdown signals, exiting"),
            }
            None
        }
    };

    shutdown.trigger();
    completion.wait().await;
    handle.stopped().await;

    match failure {
        Some(e) => {
            tracing::error!(error = %e, "exited with error");
            Err(e.into())
        }
        None => {
            tracing::info!("exited");
            Ok(())
        }
    }
}
