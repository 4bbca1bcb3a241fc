// Execution Supervisor
// Spawns the sandboxed workload with its streams wired to the workspace and
// waits for it to exit.

use super::workspace::Workspace;
use crate::domain::Run;
use crate::port::{ExecutionError, InstanceName, SandboxLaunch, SandboxRuntime};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{info, warn};

/// Exit of a supervised process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub exit_code: i64,
    pub duration: Duration,
}

pub struct ExecutionSupervisor {
    sandbox: Arc<dyn SandboxRuntime>,
}

impl ExecutionSupervisor {
    pub fn new(sandbox: Arc<dyn SandboxRuntime>) -> Self {
        Self { sandbox }
    }

    /// Run `run` in `instance`, blocking until the process exits.
    ///
    /// No timeout: the job runs to natural completion. Spawn and stream
    /// setup failures are returned as errors, never as an exit code.
    pub async fn execute(
        &self,
        run: &Run,
        instance: &InstanceName,
        workspace: &Workspace,
    ) -> Result<ExecutionOutcome, ExecutionError> {
        let (stdout, stderr) = workspace.open_streams()?;
        let command = run.normalized_command();

        info!(
            run_id = run.run_id,
            instance = %instance,
            sandbox = self.sandbox.name(),
            working_dir = %workspace.path().display(),
            command = %command,
            "Starting sandboxed execution"
        );

        let launch = SandboxLaunch {
            instance: instance.clone(),
            working_dir: workspace.path().to_path_buf(),
            command,
            stdout,
            stderr,
        };

        let started = Instant::now();
        let exit_code = match self.sandbox.run(launch).await {
            Ok(code) => code,
            Err(e) => {
                warn!(run_id = run.run_id, instance = %instance, error = %e, "Sandbox execution failed");
                return Err(e);
            }
        };
        let duration = started.elapsed();

        info!(
            run_id = run.run_id,
            instance = %instance,
            exit_code,
            duration_ms = duration.as_millis() as u64,
            "Sandboxed execution completed"
        );

        Ok(ExecutionOutcome {
            exit_code,
            duration,
        })
    }
}
