// Worker Shutdown Token
// Explicit shutdown signal checked once per iteration. File markers and OS
// signals are adapters that trigger it.

use std::path::PathBuf;
use tokio::sync::watch;

/// Why the worker was asked to stop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownReason {
    /// SIGINT / SIGTERM
    Signal,
    /// Shutdown marker file appeared
    Marker(PathBuf),
    /// Programmatic request
    Requested,
}

impl std::fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShutdownReason::Signal => write!(f, "signal"),
            ShutdownReason::Marker(path) => write!(f, "marker {}", path.display()),
            ShutdownReason::Requested => write!(f, "requested"),
        }
    }
}

/// Shutdown signal for graceful termination
#[derive(Clone)]
pub struct ShutdownToken {
    rx: watch::Receiver<Option<ShutdownReason>>,
}

impl ShutdownToken {
    /// Check if shutdown was requested
    pub fn is_shutdown(&self) -> bool {
        self.rx.borrow().is_some()
    }

    /// Reason of the first shutdown request, if any
    pub fn reason(&self) -> Option<ShutdownReason> {
        self.rx.borrow().clone()
    }

    /// Wait for shutdown. Returns immediately if already requested.
    ///
    /// Dropping every sender is not a shutdown: the wait then never completes.
    pub async fn wait(&mut self) {
        let closed = self.rx.wait_for(|reason| reason.is_some()).await.is_err();
        if closed {
            std::future::pending::<()>().await;
        }
    }
}

/// Shutdown sender
pub struct ShutdownSender {
    tx: watch::Sender<Option<ShutdownReason>>,
}

impl ShutdownSender {
    /// Signal shutdown to all workers
    pub fn shutdown(&self) {
        self.trigger(ShutdownReason::Requested);
    }

    /// Signal shutdown with a reason. Only the first reason is kept;
    /// returns false if shutdown was already requested.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        self.tx.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(reason);
            true
        })
    }

    pub fn is_shutdown(&self) -> bool {
        self.tx.borrow().is_some()
    }

    /// Another token observing this sender
    pub fn token(&self) -> ShutdownToken {
        ShutdownToken {
            rx: self.tx.subscribe(),
        }
    }
}

/// Create a shutdown channel
pub fn shutdown_channel() -> (ShutdownSender, ShutdownToken) {
    let (tx, rx) = watch::channel(None);
    (ShutdownSender { tx }, ShutdownToken { rx })
}
