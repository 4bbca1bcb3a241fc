// Worker - Lease / execute / flush loop

pub mod constants;
mod heartbeat;
mod shutdown;
mod supervisor;
mod workspace;

use constants::*;
pub use heartbeat::{HeartbeatMonitor, HeartbeatReport};
pub use shutdown::{shutdown_channel, ShutdownReason, ShutdownSender, ShutdownToken};
pub use supervisor::{ExecutionOutcome, ExecutionSupervisor};
pub use workspace::Workspace;

use crate::application::summary::summarize_file;
use crate::domain::{Run, RunId, RunResult};
use crate::error::Result;
use crate::port::{IdProvider, InstanceName, LeaseClient, SandboxRuntime};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

/// Worker tuning (defaults from `constants`)
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Delay after every iteration, whatever its outcome
    pub idle_delay: Duration,
    pub heartbeat_interval: Duration,
    pub max_extend_failures: u32,
    pub summary_bound: usize,
    /// Parent of per-run workspaces (system temp dir if None)
    pub workspace_root: Option<PathBuf>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            idle_delay: IDLE_SLEEP_DURATION,
            heartbeat_interval: HEARTBEAT_INTERVAL,
            max_extend_failures: MAX_CONSECUTIVE_EXTEND_FAILURES,
            summary_bound: SUMMARY_BOUND,
            workspace_root: None,
        }
    }
}

/// Outcome of one loop iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationOutcome {
    /// Coordinator had no run (run_id == 0)
    NoWork,
    /// A run was executed and its result flushed
    Flushed { run_id: RunId, exit_code: i64 },
}

/// Worker leases runs from the coordinator and executes them one at a time
pub struct Worker {
    lease_client: Arc<dyn LeaseClient>,
    sandbox: Arc<dyn SandboxRuntime>,
    id_provider: Arc<dyn IdProvider>,
    supervisor: ExecutionSupervisor,
    config: WorkerConfig,
}

impl Worker {
    pub fn new(
        lease_client: Arc<dyn LeaseClient>,
        sandbox: Arc<dyn SandboxRuntime>,
        id_provider: Arc<dyn IdProvider>,
        config: WorkerConfig,
    ) -> Self {
        Self {
            supervisor: ExecutionSupervisor::new(Arc::clone(&sandbox)),
            lease_client,
            sandbox,
            id_provider,
            config,
        }
    }

    /// Run worker loop until shutdown.
    ///
    /// Shutdown is checked once per iteration; an iteration in progress is
    /// always finished, only the idle delay is interrupted.
    pub async fn run(&self, mut shutdown: ShutdownToken) -> Result<()> {
        info!(sandbox = self.sandbox.name(), "Worker started");
        let mut iterations: u64 = 0;

        loop {
            if let Some(reason) = shutdown.reason() {
                info!(reason = %reason, "Worker shutting down");
                break;
            }

            iterations += 1;
            if let Err(e) = self.run_once().await {
                error!(error = %e, "Worker iteration failed");
            }

            tokio::select! {
                _ = sleep(self.config.idle_delay) => {},
                _ = shutdown.wait() => {
                    info!(reason = ?shutdown.reason(), "Worker interrupted during idle");
                    break;
                }
            }
        }

        info!(iterations, "Worker stopped");
        Ok(())
    }

    /// One iteration: acquire, execute with heartbeat, summarize, flush.
    ///
    /// Acquire and flush failures are returned; execution failures are
    /// flushed as error results.
    pub async fn run_once(&self) -> Result<IterationOutcome> {
        let run = self.lease_client.acquire().await?;
        if run.is_empty() {
            info!("No runs acquired");
            return Ok(IterationOutcome::NoWork);
        }
        run.validate()?;
        info!(run_id = run.run_id, "Acquired a run");

        let result = self.execute_run(&run).await;
        let exit_code = result.exit_code;

        if let Err(e) = self.lease_client.flush(&result).await {
            warn!(run_id = run.run_id, exit_code, "Flush failed; run result is lost");
            return Err(e);
        }

        info!(run_id = run.run_id, exit_code, "Run result flushed");
        Ok(IterationOutcome::Flushed {
            run_id: run.run_id,
            exit_code,
        })
    }

    /// Execute `run` with a heartbeat alongside and build its result.
    ///
    /// The heartbeat task is owned by this call: it is cancelled and joined
    /// before the result is built.
    async fn execute_run(&self, run: &Run) -> RunResult {
        let workspace = match Workspace::create(self.config.workspace_root.as_deref()) {
            Ok(workspace) => workspace,
            Err(e) => {
                error!(run_id = run.run_id, error = %e, "Workspace setup failed");
                return RunResult::execution_error(run.run_signature.clone(), &e);
            }
        };
        let instance = InstanceName::generate(self.id_provider.as_ref());

        let stop = CancellationToken::new();
        let heartbeat = HeartbeatMonitor::new(
            Arc::clone(&self.lease_client),
            Arc::clone(&self.sandbox),
            run.run_signature.clone(),
            instance.clone(),
            workspace.path().to_path_buf(),
            self.config.heartbeat_interval,
            self.config.max_extend_failures,
        )
        .spawn(stop.clone());

        let execution = self.supervisor.execute(run, &instance, &workspace).await;

        stop.cancel();
        match heartbeat.await {
            Ok(report) => info!(
                run_id = run.run_id,
                extended = report.extended,
                failed = report.failed,
                gave_up = report.gave_up,
                "Heartbeat finished"
            ),
            Err(e) => error!(run_id = run.run_id, error = %e, "Heartbeat task failed"),
        }

        let result = match execution {
            Ok(outcome) => RunResult::new(
                run.run_signature.clone(),
                outcome.exit_code,
                self.summarize_stream(&workspace.stdout_path()).await,
                self.summarize_stream(&workspace.stderr_path()).await,
            ),
            Err(e) => {
                error!(run_id = run.run_id, instance = %instance, error = %e, "Execution failed");
                RunResult::execution_error(run.run_signature.clone(), &e)
            }
        };

        let workspace_path = workspace.path().to_path_buf();
        if let Err(e) = workspace.close() {
            warn!(path = %workspace_path.display(), error = %e, "Workspace cleanup failed");
        }

        result
    }

    async fn summarize_stream(&self, path: &Path) -> String {
        match summarize_file(path, self.config.summary_bound).await {
            Ok(summary) => summary,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read captured output");
                format!("runner: output unavailable: {}", e)
            }
        }
    }
}
