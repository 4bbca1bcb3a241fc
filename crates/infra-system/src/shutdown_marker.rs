// Shutdown marker adapter: a file whose presence requests shutdown
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use runner_core::application::worker::{ShutdownReason, ShutdownSender};

/// How often the watcher looks for the marker
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct ShutdownMarker {
    path: PathBuf,
    poll_interval: Duration,
}

impl ShutdownMarker {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Marker present? An error while checking counts as present.
    pub fn is_present(&self) -> bool {
        match self.path.try_exists() {
            Ok(exists) => exists,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cannot check shutdown marker; assuming present");
                true
            }
        }
    }

    /// Trigger shutdown if the marker is present. Returns true if it was.
    pub fn check(&self, sender: &ShutdownSender) -> bool {
        if !self.is_present() {
            return false;
        }
        if sender.trigger(ShutdownReason::Marker(self.path.clone())) {
            info!(path = %self.path.display(), "Shutdown marker found");
        }
        true
    }

    /// Poll for the marker until it appears or shutdown is requested
    /// some other way.
    pub fn spawn_watcher(self, sender: Arc<ShutdownSender>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut token = sender.token();
            loop {
                if self.check(&sender) {
                    return;
                }
                tokio::select! {
                    _ = tokio::time::sleep(self.poll_interval) => {}
                    _ = token.wait() => return,
                }
            }
        })
    }
}
