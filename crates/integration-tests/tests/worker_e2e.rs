//! Worker against real host processes
//!
//! Coordinator is the in-memory mock; execution goes through `bash -c`.

#![cfg(unix)]

use runner_core::application::worker::{
    shutdown_channel, IterationOutcome, ShutdownReason, Worker, WorkerConfig,
};
use runner_core::domain::{Run, RunResult, RunSignature};
use runner_core::port::id_provider::UuidProvider;
use runner_core::port::lease_client::mocks::MockLeaseClient;
use runner_infra_system::{HostSandbox, ShutdownMarker};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

fn worker(lease: Arc<MockLeaseClient>, config: WorkerConfig) -> Worker {
    Worker::new(lease, Arc::new(HostSandbox::new()), Arc::new(UuidProvider), config)
}

fn config_in(root: &Path) -> WorkerConfig {
    WorkerConfig {
        workspace_root: Some(root.to_path_buf()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_echo_hello() {
    let root = tempfile::tempdir().unwrap();
    let lease = Arc::new(MockLeaseClient::new().with_run(Run::new(42, "echo hello", "sig-42")));

    let outcome = worker(lease.clone(), config_in(root.path()))
        .run_once()
        .await
        .unwrap();

    assert_eq!(
        outcome,
        IterationOutcome::Flushed {
            run_id: 42,
            exit_code: 0
        }
    );
    assert_eq!(
        lease.flushed(),
        vec![RunResult::new(RunSignature::new("sig-42"), 0, "hello\n", "")]
    );
}

#[tokio::test]
async fn test_exit_code_fidelity() {
    let root = tempfile::tempdir().unwrap();

    for (command, expected) in [("true", 0), ("exit 1", 1), ("kill -9 $$", 137)] {
        let lease = Arc::new(MockLeaseClient::new().with_run(Run::new(1, command, "sig")));

        worker(lease.clone(), config_in(root.path()))
            .run_once()
            .await
            .unwrap();

        assert_eq!(lease.flushed()[0].exit_code, expected, "command: {}", command);
    }
}

#[tokio::test]
async fn test_carriage_returns_are_stripped() {
    let root = tempfile::tempdir().unwrap();
    let lease = Arc::new(MockLeaseClient::new().with_run(Run::new(
        1,
        "echo one\r\necho two >&2\r\n",
        "sig",
    )));

    worker(lease.clone(), config_in(root.path()))
        .run_once()
        .await
        .unwrap();

    let result = &lease.flushed()[0];
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout_summary, "one\n");
    assert_eq!(result.stderr_summary, "two\n");
}

#[tokio::test]
async fn test_large_output_is_truncated() {
    let root = tempfile::tempdir().unwrap();
    let lease = Arc::new(MockLeaseClient::new().with_run(Run::new(
        1,
        "head -c 150000 /dev/zero | tr '\\0' a; head -c 150000 /dev/zero | tr '\\0' b",
        "sig",
    )));

    worker(lease.clone(), config_in(root.path()))
        .run_once()
        .await
        .unwrap();

    let stdout = &lease.flushed()[0].stdout_summary;
    assert_eq!(stdout.len(), 200_003);
    assert_eq!(stdout, &format!("{}...{}", "a".repeat(100_000), "b".repeat(100_000)));
}

#[tokio::test]
async fn test_workspace_is_removed_after_run() {
    let root = tempfile::tempdir().unwrap();
    let lease = Arc::new(MockLeaseClient::new().with_run(Run::new(1, "pwd", "sig")));

    worker(lease.clone(), config_in(root.path()))
        .run_once()
        .await
        .unwrap();

    let cwd = lease.flushed()[0].stdout_summary.trim().to_string();
    let name = Path::new(&cwd).file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("executor"), "cwd: {}", cwd);
    assert_eq!(std::fs::read_dir(root.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_liveness_marker_appears_while_running() {
    let root = tempfile::tempdir().unwrap();
    let lease = Arc::new(MockLeaseClient::new().with_run(Run::new(
        1,
        "for i in $(seq 50); do [ -f watchdog ] && echo alive && exit 0; sleep 0.1; done; exit 1",
        "sig",
    )));
    let config = WorkerConfig {
        heartbeat_interval: Duration::from_millis(200),
        ..config_in(root.path())
    };

    worker(lease.clone(), config).run_once().await.unwrap();

    let result = &lease.flushed()[0];
    assert_eq!(result.exit_code, 0);
    assert_eq!(result.stdout_summary, "alive\n");
    assert!(lease.extend_count() >= 1);
}

#[tokio::test]
async fn test_marker_stops_loop_before_first_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let marker_path = dir.path().join("shutdown");
    std::fs::write(&marker_path, b"").unwrap();
    let lease = Arc::new(MockLeaseClient::new().with_run(Run::new(1, "true", "sig")));
    let (tx, token) = shutdown_channel();

    assert!(ShutdownMarker::new(&marker_path).check(&tx));
    worker(lease.clone(), config_in(dir.path()))
        .run(token)
        .await
        .unwrap();

    assert_eq!(lease.acquire_count(), 0);
    assert!(lease.flushed().is_empty());
}

#[tokio::test]
async fn test_marker_finishes_current_iteration() {
    let dir = tempfile::tempdir().unwrap();
    let marker_path = dir.path().join("shutdown");
    // The job itself creates the marker, then keeps running a little
    let command = format!("touch {}; sleep 0.3; echo finished", marker_path.display());
    let lease = Arc::new(MockLeaseClient::new().with_run(Run::new(1, command, "sig")));
    let (tx, token) = shutdown_channel();
    let watcher = ShutdownMarker::new(&marker_path)
        .with_poll_interval(Duration::from_millis(20))
        .spawn_watcher(Arc::new(tx));

    tokio::time::timeout(
        Duration::from_secs(10),
        worker(lease.clone(), config_in(dir.path())).run(token),
    )
    .await
    .unwrap()
    .unwrap();
    watcher.await.unwrap();

    assert_eq!(lease.acquire_count(), 1);
    let flushed = lease.flushed();
    assert_eq!(flushed.len(), 1);
    assert_eq!(flushed[0].stdout_summary, "finished\n");
}

#[tokio::test]
async fn test_signal_reason_is_kept() {
    let (tx, token) = shutdown_channel();
    tx.trigger(ShutdownReason::Signal);
    tx.trigger(ShutdownReason::Requested);
    assert_eq!(token.reason(), Some(ShutdownReason::Signal));
}
