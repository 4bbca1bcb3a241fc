//! Coordinator wire types (JSON-RPC params and results)

use runner_core::domain::{Run, RunId, RunResult, RunSignature};
use serde::{Deserialize, Serialize};

pub const METHOD_ACQUIRE: &str = "run.acquire.v1";
pub const METHOD_EXTEND: &str = "run.extend.v1";
pub const METHOD_FLUSH: &str = "run.flush.v1";

/// Result of `run.acquire.v1`. `run_id == 0` means no work.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AcquireResponse {
    #[serde(default)]
    pub run_id: RunId,
    #[serde(default)]
    pub run_command: String,
    #[serde(default)]
    pub run_signature: String,
}

impl From<AcquireResponse> for Run {
    fn from(r: AcquireResponse) -> Self {
        Run::new(r.run_id, r.run_command, r.run_signature)
    }
}

impl From<Run> for AcquireResponse {
    fn from(run: Run) -> Self {
        Self {
            run_id: run.run_id,
            run_command: run.run_command,
            run_signature: run.run_signature.as_str().to_string(),
        }
    }
}

/// Params of `run.extend.v1`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtendRequest {
    pub run_signature: String,
}

impl From<&RunSignature> for ExtendRequest {
    fn from(signature: &RunSignature) -> Self {
        Self {
            run_signature: signature.as_str().to_string(),
        }
    }
}

/// Params of `run.flush.v1`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlushRequest {
    pub run_signature: String,
    pub run_code: i64,
    pub run_stdout: String,
    pub run_stderr: String,
}

impl From<&RunResult> for FlushRequest {
    fn from(result: &RunResult) -> Self {
        Self {
            run_signature: result.run_signature.as_str().to_string(),
            run_code: result.exit_code,
            run_stdout: result.stdout_summary.clone(),
            run_stderr: result.stderr_summary.clone(),
        }
    }
}

/// Result of `run.extend.v1` and `run.flush.v1`
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AckResponse {
    pub ok: bool,
}

impl AckResponse {
    pub fn ok() -> Self {
        Self { ok: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flush_request_wire_names() {
        let result = RunResult::new(RunSignature::new("sig-42"), 137, "out", "err");
        let json = serde_json::to_value(FlushRequest::from(&result)).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "run_signature": "sig-42",
                "run_code": 137,
                "run_stdout": "out",
                "run_stderr": "err",
            })
        );
    }

    #[test]
    fn test_empty_acquire_is_no_work() {
        let response: AcquireResponse = serde_json::from_str("{}").unwrap();
        assert!(Run::from(response).is_empty());
    }
}
