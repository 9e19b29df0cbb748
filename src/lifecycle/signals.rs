//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl-C) or SIGTERM
//! - Report which one arrived so the owner can log it and fire [`Shutdown`]
//!
//! [`Shutdown`]: crate::lifecycle::Shutdown

use std::io;

/// Resolve when the process is asked to stop. Returns the signal name.
#[cfg(unix)]
pub async fn wait_for_signal() -> io::Result<&'static str> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|()| "interrupt"),
        _ = terminate.recv() => Ok("terminated"),
    }
}

/// Resolve when the process is asked to stop. Returns the signal name.
#[cfg(not(unix))]
pub async fn wait_for_signal() -> io::Result<&'static str> {
    tokio::signal::ctrl_c().await?;
    Ok("interrupt")
}
