// Run Domain Model

use super::error::{DomainError, Result};
use serde::{Deserialize, Serialize};

/// Run ID assigned by the coordinator
pub type RunId = i64;

/// Sentinel run ID: the coordinator had no work to hand out
pub const NO_RUN: RunId = 0;

/// Exit code reported when the sandbox never produced one
/// (workspace or spawn failure)
pub const EXECUTION_ERROR_EXIT_CODE: i64 = -1;

/// Opaque lease token, presented on every extend/flush call
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunSignature(String);

impl RunSignature {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for RunSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Run snapshot leased from the coordinator.
///
/// Immutable for the duration of one worker iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Run {
    pub run_id: RunId,
    pub run_command: String,
    pub run_signature: RunSignature,
}

impl Run {
    pub fn new(
        run_id: RunId,
        run_command: impl Into<String>,
        run_signature: impl Into<String>,
    ) -> Self {
        Self {
            run_id,
            run_command: run_command.into(),
            run_signature: RunSignature::new(run_signature),
        }
    }

    /// The "no work available" answer
    pub fn empty() -> Self {
        Self {
            run_id: NO_RUN,
            run_command: String::new(),
            run_signature: RunSignature::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.run_id == NO_RUN
    }

    /// Command as handed to the sandbox: carriage returns stripped
    pub fn normalized_command(&self) -> String {
        self.run_command.replace('\r', "")
    }

    /// A leased run must carry a signature, otherwise it can never be flushed
    pub fn validate(&self) -> Result<()> {
        if self.run_id < 0 {
            return Err(DomainError::InvalidRun(format!(
                "negative run_id {}",
                self.run_id
            )));
        }
        if !self.is_empty() && self.run_signature.is_empty() {
            return Err(DomainError::InvalidRun(format!(
                "run {} has no signature",
                self.run_id
            )));
        }
        Ok(())
    }
}

/// Terminal outcome of a run. Constructed once, flushed once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunResult {
    pub run_signature: RunSignature,
    pub exit_code: i64,
    pub stdout_summary: String,
    pub stderr_summary: String,
}

impl RunResult {
    pub fn new(
        run_signature: RunSignature,
        exit_code: i64,
        stdout_summary: impl Into<String>,
        stderr_summary: impl Into<String>,
    ) -> Self {
        Self {
            run_signature,
            exit_code,
            stdout_summary: stdout_summary.into(),
            stderr_summary: stderr_summary.into(),
        }
    }

    /// Result for a run whose sandbox never started.
    ///
    /// Carries `EXECUTION_ERROR_EXIT_CODE` and the error text on stderr so the
    /// coordinator cannot mistake it for a clean exit.
    pub fn execution_error(run_signature: RunSignature, error: &dyn std::fmt::Display) -> Self {
        Self {
            run_signature,
            exit_code: EXECUTION_ERROR_EXIT_CODE,
            stdout_summary: String::new(),
            stderr_summary: format!("runner: {}", error),
        }
    }

    pub fn is_execution_error(&self) -> bool {
        self.exit_code == EXECUTION_ERROR_EXIT_CODE
    }
}
