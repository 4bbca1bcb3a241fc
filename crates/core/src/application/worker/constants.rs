// Worker constants (No magic values)
use std::time::Duration;

/// Delay between loop iterations, whatever the outcome (10s)
pub const IDLE_SLEEP_DURATION: Duration = Duration::from_secs(10);

/// Lease extension cadence while a run executes (10s)
pub const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(10);

/// Lower bound for a configured heartbeat interval (a zero period cannot tick)
pub const MIN_HEARTBEAT_INTERVAL: Duration = Duration::from_millis(100);

/// Consecutive extend failures after which the heartbeat gives up
/// (the job itself keeps running)
pub const MAX_CONSECUTIVE_EXTEND_FAILURES: u32 = 5;

/// Maximum size of a reported output stream before head/tail truncation
pub const SUMMARY_BOUND: usize = 200_000;

/// Marker placed between head and tail of a truncated stream
pub const SUMMARY_ELLIPSIS: &[u8] = b"...";

/// Workspace stream file names
pub const STDOUT_FILE: &str = "stdout";
pub const STDERR_FILE: &str = "stderr";

/// Prefix of per-run workspace directories
pub const WORKSPACE_PREFIX: &str = "executor";

/// Prefix of sandbox instance names
pub const INSTANCE_NAME_PREFIX: &str = "runner";

/// File touched inside the sandbox on every successful heartbeat
pub const LIVENESS_MARKER: &str = "watchdog";

/// Default shutdown marker path
pub const DEFAULT_SHUTDOWN_MARKER: &str = "/shutdown";
