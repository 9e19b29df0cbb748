//! TCP listener.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming TCP connections
//! - Separate per-connection accept hiccups from fatal listener failures

use std::io;
use std::net::SocketAddr;

use thiserror::Error;
use tokio::net::{TcpListener, TcpStream};

/// Error type for listener operations.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// Failed to bind to address.
    #[error("failed to bind {address}: {source}")]
    Bind {
        address: String,
        #[source]
        source: io::Error,
    },

    /// The accept loop hit an unrecoverable error.
    #[error("failed to accept on {address}: {source}")]
    Accept {
        address: SocketAddr,
        #[source]
        source: io::Error,
    },
}

/// Errors tied to a single half-open connection; the listener itself is fine.
fn is_connection_error(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        io::ErrorKind::ConnectionRefused
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::Interrupted
    )
}

/// A bound TCP listener.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to `address` (`host:port`, host names are resolved).
    pub async fn bind(address: &str) -> Result<Self, ListenerError> {
        let bind_err = |source| ListenerError::Bind {
            address: address.to_string(),
            source,
        };
        let inner = TcpListener::bind(address).await.map_err(bind_err)?;
        let local_addr = inner.local_addr().map_err(bind_err)?;

        tracing::debug!(address = %local_addr, "Listener bound");
        Ok(Self { inner, local_addr })
    }

    /// Accept the next connection.
    ///
    /// Connection-level failures are skipped; anything else is returned and
    /// ends the accept loop.
    pub async fn accept(&self) -> Result<(TcpStream, SocketAddr), ListenerError> {
        loop {
            match self.inner.accept().await {
                Ok(accepted) => return Ok(accepted),
                Err(e) if is_connection_error(&e) => {
                    tracing::debug!(error = %e, "Dropped connection during accept");
                }
                Err(source) => {
                    return Err(ListenerError::Accept {
                        address: self.local_addr,
                        source,
                    })
                }
            }
        }
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bind_ephemeral_and_accept() {
        let listener = Listener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr();
        assert_ne!(addr.port(), 0);

        let client = tokio::spawn(async move { TcpStream::connect(addr).await.unwrap() });
        let (_stream, peer) = listener.accept().await.unwrap();
        assert!(peer.ip().is_loopback());
        client.await.unwrap();
    }

    #[tokio::test]
    async fn test_bind_conflict_is_reported() {
        let first = Listener::bind("127.0.0.1:0").await.unwrap();
        let taken = first.local_addr().to_string();
        let err = Listener::bind(&taken).await.unwrap_err();
        assert!(matches!(err, ListenerError::Bind { .. }));
        assert!(err.to_string().contains(&taken));
    }

    #[test]
    fn test_connection_errors_are_not_fatal() {
        assert!(is_connection_error(&io::Error::from(io::ErrorKind::ConnectionReset)));
        assert!(!is_connection_error(&io::Error::from(io::ErrorKind::PermissionDenied)));
    }
}
