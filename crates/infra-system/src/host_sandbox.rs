// Host sandbox: runs commands with `bash -c` directly on the host.
// No isolation; meant for development and tests.
use async_trait::async_trait;
use std::path::Path;
use tokio::fs::OpenOptions;
use tracing::info;

use runner_core::application::worker::constants::LIVENESS_MARKER;
use runner_core::port::{ExecutionError, InstanceName, SandboxLaunch, SandboxRuntime};

use crate::process::spawn_and_wait;

/// Shell used to interpret run commands
const SHELL: &str = "bash";

#[derive(Debug, Clone, Default)]
pub struct HostSandbox;

impl HostSandbox {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SandboxRuntime for HostSandbox {
    async fn run(&self, launch: SandboxLaunch) -> Result<i64, ExecutionError> {
        info!(
            instance = %launch.instance,
            working_dir = %launch.working_dir.display(),
            "Starting host process"
        );
        let command = launch.command.clone();
        spawn_and_wait(SHELL, &["-c", command.as_str()], launch).await
    }

    /// Touch `<working_dir>/watchdog`; the job sees it as `./watchdog`
    async fn signal_liveness(
        &self,
        _instance: &InstanceName,
        working_dir: &Path,
    ) -> Result<(), ExecutionError> {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(working_dir.join(LIVENESS_MARKER))
            .await
            .map(|_| ())
            .map_err(|e| ExecutionError::Signal(e.to_string()))
    }

    fn name(&self) -> &'static str {
        "host"
    }
}
