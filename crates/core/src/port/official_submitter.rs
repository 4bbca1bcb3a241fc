// Official Submitter Port
// Forwards a final solution to the official scoring service

use crate::domain::ProblemId;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait OfficialSubmitter: Send + Sync {
    /// Submit `solution` for `problem_id`; returns the pose ID the service assigned
    async fn submit(&self, problem_id: ProblemId, solution: &str) -> Result<String>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    /// Mock official service returning a fixed pose ID (or error)
    pub struct MockOfficialSubmitter {
        response: std::result::Result<String, String>,
        calls: Arc<Mutex<Vec<(ProblemId, String)>>>,
    }

    impl MockOfficialSubmitter {
        pub fn new(pose_id: impl Into<String>) -> Self {
            Self {
                response: Ok(pose_id.into()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_failing(message: impl Into<String>) -> Self {
            Self {
                response: Err(message.into()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }

        pub fn calls(&self) -> Vec<(ProblemId, String)> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl OfficialSubmitter for MockOfficialSubmitter {
        async fn submit(&self, problem_id: ProblemId, solution: &str) -> Result<String> {
            self.calls
                .lock()
                .unwrap()
                .push((problem_id, solution.to_string()));
            self.response
                .clone()
                .map_err(AppError::OfficialSubmission)
        }
    }
}
