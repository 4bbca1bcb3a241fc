// Lease Client Port
// Coordinator operations: acquire a run, extend its lease, flush its result

use crate::domain::{Run, RunResult, RunSignature};
use crate::error::Result;
use async_trait::async_trait;

/// Coordinator lease protocol
#[async_trait]
pub trait LeaseClient: Send + Sync {
    /// Lease the next run.
    ///
    /// "No work" is `Ok(Run::empty())` (run_id == 0), never an error.
    /// Transport failures are returned as errors.
    async fn acquire(&self) -> Result<Run>;

    /// Extend the lease held by `signature`. Idempotent.
    ///
    /// An error only means "not extended this time"; callers count
    /// consecutive failures themselves.
    async fn extend(&self, signature: &RunSignature) -> Result<()>;

    /// Report the terminal result of a run. Not retried by the worker.
    async fn flush(&self, result: &RunResult) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// Scripted extend behavior
    #[derive(Debug, Clone)]
    pub enum ExtendBehavior {
        /// Every call succeeds
        Succeed,
        /// Every call fails
        Fail,
        /// The first N calls fail, the rest succeed
        FailFirst(usize),
        /// Every call succeeds after the given delay
        Slow(std::time::Duration),
    }

    /// Mock coordinator: scripted acquires, recorded extends and flushes
    pub struct MockLeaseClient {
        acquires: Arc<Mutex<VecDeque<std::result::Result<Run, String>>>>,
        extend_behavior: Arc<Mutex<ExtendBehavior>>,
        fail_flush: bool,
        acquire_calls: Arc<Mutex<usize>>,
        extend_calls: Arc<Mutex<Vec<RunSignature>>>,
        flushed: Arc<Mutex<Vec<RunResult>>>,
    }

    impl MockLeaseClient {
        /// Coordinator with no work (every acquire returns run_id 0)
        pub fn new() -> Self {
            Self {
                acquires: Arc::new(Mutex::new(VecDeque::new())),
                extend_behavior: Arc::new(Mutex::new(ExtendBehavior::Succeed)),
                fail_flush: false,
                acquire_calls: Arc::new(Mutex::new(0)),
                extend_calls: Arc::new(Mutex::new(Vec::new())),
                flushed: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Queue a run for the next acquire
        pub fn with_run(self, run: Run) -> Self {
            self.acquires.lock().unwrap().push_back(Ok(run));
            self
        }

        /// Queue a transport failure for the next acquire
        pub fn with_acquire_error(self, message: impl Into<String>) -> Self {
            self.acquires.lock().unwrap().push_back(Err(message.into()));
            self
        }

        pub fn with_extend(self, behavior: ExtendBehavior) -> Self {
            *self.extend_behavior.lock().unwrap() = behavior;
            self
        }

        pub fn with_flush_failure(mut self) -> Self {
            self.fail_flush = true;
            self
        }

        pub fn acquire_count(&self) -> usize {
            *self.acquire_calls.lock().unwrap()
        }

        pub fn extend_count(&self) -> usize {
            self.extend_calls.lock().unwrap().len()
        }

        pub fn extended_signatures(&self) -> Vec<RunSignature> {
            self.extend_calls.lock().unwrap().clone()
        }

        pub fn flushed(&self) -> Vec<RunResult> {
            self.flushed.lock().unwrap().clone()
        }
    }

    impl Default for MockLeaseClient {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl LeaseClient for MockLeaseClient {
        async fn acquire(&self) -> Result<Run> {
            *self.acquire_calls.lock().unwrap() += 1;
            match self.acquires.lock().unwrap().pop_front() {
                Some(Ok(run)) => Ok(run),
                Some(Err(msg)) => Err(AppError::Coordinator(msg)),
                None => Ok(Run::empty()),
            }
        }

        async fn extend(&self, signature: &RunSignature) -> Result<()> {
            let attempt = {
                let mut calls = self.extend_calls.lock().unwrap();
                calls.push(signature.clone());
                calls.len()
            };

            let behavior = self.extend_behavior.lock().unwrap().clone();
            let fails = match behavior {
                ExtendBehavior::Succeed => false,
                ExtendBehavior::Fail => true,
                ExtendBehavior::FailFirst(n) => attempt <= n,
                ExtendBehavior::Slow(delay) => {
                    tokio::time::sleep(delay).await;
                    false
                }
            };

            if fails {
                Err(AppError::Coordinator(format!(
                    "lease {} not extended",
                    signature
                )))
            } else {
                Ok(())
            }
        }

        async fn flush(&self, result: &RunResult) -> Result<()> {
            if self.fail_flush {
                return Err(AppError::Coordinator("flush rejected".to_string()));
            }
            self.flushed.lock().unwrap().push(result.clone());
            Ok(())
        }
    }
}
