//! Completion tracking for background servers.
//!
//! Each server holds a [`CompletionToken`] for as long as it runs. The token
//! is released exactly once, when it is dropped, no matter which path the
//! shutdown took. The process owner waits on the [`CompletionGroup`] before
//! exiting.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicUsize,
    notify: Notify,
}

/// Tracks outstanding completion tokens.
#[derive(Debug, Clone, Default)]
pub struct CompletionGroup {
    inner: Arc<Inner>,
}

impl CompletionGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one more unit of work.
    pub fn acquire(&self) -> CompletionToken {
        self.inner.pending.fetch_add(1, Ordering::SeqCst);
        CompletionToken {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Tokens not yet released.
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::SeqCst)
    }

    /// Wait until every token has been released.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.notify.notified();
            tokio::pin!(notified);
            // Register interest before checking to avoid a lost wakeup.
            notified.as_mut().enable();
            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Proof of outstanding work. Released on drop.
#[derive(Debug)]
#[must_use = "dropping the token marks the work as complete"]
pub struct CompletionToken {
    inner: Arc<Inner>,
}

impl CompletionToken {
    /// Release explicitly.
    pub fn complete(self) {}
}

impl Drop for CompletionToken {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::SeqCst) == 1 {
            self.inner.notify.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_without_tokens_returns() {
        let group = CompletionGroup::new();
        tokio::time::timeout(Duration::from_millis(100), group.wait())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_wait_blocks_until_all_released() {
        let group = CompletionGroup::new();
        let first = group.acquire();
        let second = group.acquire();
        assert_eq!(group.pending(), 2);

        let waiter = {
            let group = group.clone();
            tokio::spawn(async move { group.wait().await })
        };

        first.complete();
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());
        assert_eq!(group.pending(), 1);

        drop(second);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(group.pending(), 0);
    }

    #[tokio::test]
    async fn test_token_moved_into_task_releases_on_exit() {
        let group = CompletionGroup::new();
        let token = group.acquire();
        tokio::spawn(async move {
            let _token = token;
            tokio::time::sleep(Duration::from_millis(10)).await;
        });
        tokio::time::timeout(Duration::from_secs(1), group.wait())
            .await
            .unwrap();
    }
}
