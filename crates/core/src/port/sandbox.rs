// Sandbox Runtime Port
// Abstraction over the container/process isolation runtime (opaque to the core)

use crate::application::worker::constants::INSTANCE_NAME_PREFIX;
use crate::port::IdProvider;
use async_trait::async_trait;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of one sandbox instance, unique across concurrently running workers
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InstanceName(String);

impl InstanceName {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Generate a fresh name from an ID provider
    pub fn generate(id_provider: &dyn IdProvider) -> Self {
        Self(format!("{}-{}", INSTANCE_NAME_PREFIX, id_provider.generate_id()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for InstanceName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything a runtime needs to launch one run.
///
/// `stdout` / `stderr` are the workspace stream files; the runtime owns them
/// until the process exits.
#[derive(Debug)]
pub struct SandboxLaunch {
    pub instance: InstanceName,
    pub working_dir: PathBuf,
    pub command: String,
    pub stdout: File,
    pub stderr: File,
}

/// Execution errors (distinct from a non-zero exit code)
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Workspace error: {0}")]
    Workspace(String),

    #[error("Wait failed: {0}")]
    Wait(String),

    #[error("Liveness signal failed: {0}")]
    Signal(String),
}

/// Sandbox runtime trait
///
/// Implementations:
/// - DockerSandbox: `docker run` / `docker exec`
/// - HostSandbox: plain `bash -c` on the host (development only)
#[async_trait]
pub trait SandboxRuntime: Send + Sync {
    /// Launch the command and block until it exits, returning its exit code
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the runtime itself could not start
    /// - ExecutionError::Wait if the exit status could not be collected
    async fn run(&self, launch: SandboxLaunch) -> Result<i64, ExecutionError>;

    /// Signal liveness into a running instance (the job can watch for it)
    async fn signal_liveness(
        &self,
        instance: &InstanceName,
        working_dir: &Path,
    ) -> Result<(), ExecutionError>;

    /// Runtime name for logs
    fn name(&self) -> &'static str;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Mock sandbox behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Write the given streams, run for `duration`, exit with `exit_code`
        Exit {
            exit_code: i64,
            stdout: Vec<u8>,
            stderr: Vec<u8>,
            duration: Duration,
        },
        /// The runtime cannot start the process
        SpawnFail(String),
    }

    /// Mock Sandbox for testing (records launches and liveness signals)
    pub struct MockSandbox {
        behavior: Arc<Mutex<MockBehavior>>,
        launches: Arc<Mutex<Vec<(InstanceName, String)>>>,
        liveness_signals: Arc<Mutex<usize>>,
    }

    impl MockSandbox {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior: Arc::new(Mutex::new(behavior)),
                launches: Arc::new(Mutex::new(Vec::new())),
                liveness_signals: Arc::new(Mutex::new(0)),
            }
        }

        pub fn new_exit(exit_code: i64, stdout: impl Into<Vec<u8>>) -> Self {
            Self::new(MockBehavior::Exit {
                exit_code,
                stdout: stdout.into(),
                stderr: Vec::new(),
                duration: Duration::ZERO,
            })
        }

        /// Job that runs for `duration` before exiting 0
        pub fn new_long_running(duration: Duration) -> Self {
            Self::new(MockBehavior::Exit {
                exit_code: 0,
                stdout: Vec::new(),
                stderr: Vec::new(),
                duration,
            })
        }

        pub fn new_spawn_failure(message: impl Into<String>) -> Self {
            Self::new(MockBehavior::SpawnFail(message.into()))
        }

        pub fn launch_count(&self) -> usize {
            self.launches.lock().unwrap().len()
        }

        /// (instance, command) of every launch
        pub fn launches(&self) -> Vec<(InstanceName, String)> {
            self.launches.lock().unwrap().clone()
        }

        pub fn liveness_count(&self) -> usize {
            *self.liveness_signals.lock().unwrap()
        }
    }

    #[async_trait]
    impl SandboxRuntime for MockSandbox {
        async fn run(&self, launch: SandboxLaunch) -> Result<i64, ExecutionError> {
            self.launches
                .lock()
                .unwrap()
                .push((launch.instance.clone(), launch.command.clone()));

            let behavior = self.behavior.lock().unwrap().clone();
            match behavior {
                MockBehavior::Exit {
                    exit_code,
                    stdout,
                    stderr,
                    duration,
                } => {
                    let SandboxLaunch {
                        stdout: mut out,
                        stderr: mut err,
                        ..
                    } = launch;
                    out.write_all(&stdout)
                        .map_err(|e| ExecutionError::Wait(e.to_string()))?;
                    err.write_all(&stderr)
                        .map_err(|e| ExecutionError::Wait(e.to_string()))?;
                    drop(out);
                    drop(err);

                    if !duration.is_zero() {
                        tokio::time::sleep(duration).await;
                    }
                    Ok(exit_code)
                }
                MockBehavior::SpawnFail(msg) => Err(ExecutionError::SpawnFailed(msg)),
            }
        }

        async fn signal_liveness(
            &self,
            _instance: &InstanceName,
            _working_dir: &Path,
        ) -> Result<(), ExecutionError> {
            *self.liveness_signals.lock().unwrap() += 1;
            Ok(())
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }
}
