// Heartbeat Monitor
// Keeps the lease of a running run alive and signals liveness into the sandbox.

use crate::application::worker::constants::MIN_HEARTBEAT_INTERVAL;
use crate::domain::RunSignature;
use crate::port::{InstanceName, LeaseClient, SandboxRuntime};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// What the monitor did during one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeartbeatReport {
    /// Successful extend calls
    pub extended: u32,
    /// Failed extend calls
    pub failed: u32,
    /// Stopped after too many consecutive failures (lease may be reclaimed)
    pub gave_up: bool,
}

/// Periodic lease extension for one run.
///
/// Runs independently of the execution: giving up never stops the job, and
/// completion of the job stops the monitor through the cancellation token.
pub struct HeartbeatMonitor {
    lease_client: Arc<dyn LeaseClient>,
    sandbox: Arc<dyn SandboxRuntime>,
    signature: RunSignature,
    instance: InstanceName,
    working_dir: PathBuf,
    interval: Duration,
    max_failures: u32,
}

impl HeartbeatMonitor {
    /// `interval` is clamped to `MIN_HEARTBEAT_INTERVAL`.
    pub fn new(
        lease_client: Arc<dyn LeaseClient>,
        sandbox: Arc<dyn SandboxRuntime>,
        signature: RunSignature,
        instance: InstanceName,
        working_dir: PathBuf,
        interval: Duration,
        max_failures: u32,
    ) -> Self {
        Self {
            lease_client,
            sandbox,
            signature,
            instance,
            working_dir,
            interval: interval.max(MIN_HEARTBEAT_INTERVAL),
            max_failures,
        }
    }

    /// Spawn the monitor; the caller owns the handle and must cancel `stop`
    /// and await it once the run completes.
    pub fn spawn(self, stop: CancellationToken) -> JoinHandle<HeartbeatReport> {
        tokio::spawn(self.run(stop))
    }

    /// Tick loop. The first extend happens one interval after start.
    ///
    /// Once `stop` is observed no further extend call is issued.
    pub async fn run(self, stop: CancellationToken) -> HeartbeatReport {
        let mut report = HeartbeatReport::default();
        let mut consecutive_failures: u32 = 0;

        let mut ticker = interval_at(Instant::now() + self.interval, self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                biased;
                _ = stop.cancelled() => {
                    debug!(signature = %self.signature, "Heartbeat stopped: run completed");
                    break;
                }
                _ = ticker.tick() => {}
            }

            // Extend is idempotent, so an in-flight call may be abandoned
            let extended = tokio::select! {
                biased;
                _ = stop.cancelled() => {
                    debug!(signature = %self.signature, "Heartbeat stopped during lease extension");
                    break;
                }
                result = self.lease_client.extend(&self.signature) => result,
            };

            match extended {
                Ok(()) => {
                    consecutive_failures = 0;
                    report.extended += 1;
                    debug!(signature = %self.signature, "Lease extended");

                    let signalled = tokio::select! {
                        biased;
                        _ = stop.cancelled() => break,
                        result = self.sandbox.signal_liveness(&self.instance, &self.working_dir) => result,
                    };
                    if let Err(e) = signalled {
                        warn!(instance = %self.instance, error = %e, "Liveness signal failed");
                    }
                }
                Err(e) => {
                    consecutive_failures += 1;
                    report.failed += 1;
                    warn!(
                        signature = %self.signature,
                        consecutive_failures,
                        error = %e,
                        "Lease extension failed"
                    );

                    if consecutive_failures >= self.max_failures {
                        // The job keeps running; the coordinator may reclaim and
                        // re-dispatch this run elsewhere.
                        warn!(
                            signature = %self.signature,
                            instance = %self.instance,
                            "Giving up lease extension; lease may be reclaimed"
                        );
                        report.gave_up = true;
                        break;
                    }
                }
            }
        }

        report
    }
}
