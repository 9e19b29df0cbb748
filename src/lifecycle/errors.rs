//! Fatal error fan-in from servers to the process owner.
//!
//! A bounded channel of capacity one. Servers report with [`ErrorSender::report`],
//! which never blocks: once a fatal error is queued, later ones are logged
//! and dropped. The owner reads it once and starts shutdown.

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use crate::net::ListenerError;

/// Create a connected sender/receiver pair.
pub fn error_channel() -> (ErrorSender, ErrorReceiver) {
    let (tx, rx) = mpsc::channel(1);
    (ErrorSender { tx }, ErrorReceiver { rx })
}

/// Reporting side, cloned into every server.
#[derive(Debug, Clone)]
pub struct ErrorSender {
    tx: mpsc::Sender<ListenerError>,
}

impl ErrorSender {
    /// Queue `err`. Returns `false` if it was dropped.
    pub fn report(&self, err: ListenerError) -> bool {
        match self.tx.try_send(err) {
            Ok(()) => true,
            Err(TrySendError::Full(err)) => {
                tracing::warn!(error = %err, "Fatal error already pending, dropping");
                false
            }
            Err(TrySendError::Closed(err)) => {
                tracing::warn!(error = %err, "Nobody is listening for fatal errors, dropping");
                false
            }
        }
    }
}

/// Owner side.
#[derive(Debug)]
pub struct ErrorReceiver {
    rx: mpsc::Receiver<ListenerError>,
}

impl ErrorReceiver {
    /// Wait for a fatal error. `None` once every sender is gone.
    pub async fn recv(&mut self) -> Option<ListenerError> {
        self.rx.recv().await
    }

    pub fn try_recv(&mut self) -> Option<ListenerError> {
        self.rx.try_recv().ok()
    }
}
