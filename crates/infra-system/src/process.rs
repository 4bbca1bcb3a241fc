// Child process plumbing shared by the sandbox runtimes
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

use runner_core::port::{ExecutionError, SandboxLaunch};

/// Exit code reported for a process killed by a signal: `128 + signo`,
/// the shell convention
pub const SIGNAL_EXIT_BASE: i64 = 128;

/// Map an exit status to a single integer exit code
pub fn exit_code(status: ExitStatus) -> i64 {
    if let Some(code) = status.code() {
        return i64::from(code);
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return SIGNAL_EXIT_BASE + i64::from(signal);
        }
    }

    runner_core::domain::EXECUTION_ERROR_EXIT_CODE
}

/// Spawn `program args..` in the launch's working directory with stdout and
/// stderr redirected to the launch's stream files, then wait for it.
///
/// No timeout: the process runs until it exits on its own.
pub async fn spawn_and_wait(
    program: &str,
    args: &[&str],
    launch: SandboxLaunch,
) -> Result<i64, ExecutionError> {
    let SandboxLaunch {
        instance,
        working_dir,
        stdout,
        stderr,
        ..
    } = launch;

    let mut child = Command::new(program)
        .args(args)
        .current_dir(&working_dir)
        .stdin(Stdio::null())
        .stdout(Stdio::from(stdout))
        .stderr(Stdio::from(stderr))
        .spawn()
        .map_err(|e| ExecutionError::SpawnFailed(format!("{}: {}", program, e)))?;

    debug!(instance = %instance, pid = ?child.id(), program, "Process spawned");

    let status = child
        .wait()
        .await
        .map_err(|e| ExecutionError::Wait(e.to_string()))?;

    Ok(exit_code(status))
}

/// Run a short helper command to completion, failing on a non-zero exit
pub async fn run_helper(program: &str, args: &[&str]) -> Result<(), ExecutionError> {
    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|e| ExecutionError::Signal(format!("{}: {}", program, e)))?;

    if !output.status.success() {
        return Err(ExecutionError::Signal(format!(
            "{} exited with {}: {}",
            program,
            exit_code(output.status),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }
    Ok(())
}
