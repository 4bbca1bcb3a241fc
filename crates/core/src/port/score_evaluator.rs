// Score Evaluator Port
// External scoring service: evaluates a solution for a problem

use crate::domain::{Evaluation, ProblemId};
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait ScoreEvaluator: Send + Sync {
    /// Evaluate a solution payload. A negative score marks an invalid solution.
    async fn evaluate(&self, problem_id: ProblemId, solution: &str) -> Result<Evaluation>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    /// Mock evaluator returning a fixed evaluation (or error)
    pub struct MockScoreEvaluator {
        evaluation: std::result::Result<Evaluation, String>,
        calls: Arc<Mutex<Vec<(ProblemId, String)>>>,
    }

    impl MockScoreEvaluator {
        pub fn new(evaluation: Evaluation) -> Self {
            Self {
                evaluation: Ok(evaluation),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        /// Evaluator scoring every solution with `score` and no bonuses
        pub fn with_score(score: i64) -> Self {
            Self::new(Evaluation {
                score,
                bonuses: String::new(),
                obtained_bonuses: String::new(),
                bonuses_hash: String::new(),
            })
        }

        pub fn new_unavailable(message: impl Into<String>) -> Self {
            Self {
                evaluation: Err(message.into()),
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl ScoreEvaluator for MockScoreEvaluator {
        async fn evaluate(&self, problem_id: ProblemId, solution: &str) -> Result<Evaluation> {
            self.calls
                .lock()
                .unwrap()
                .push((problem_id, solution.to_string()));
            self.evaluation
                .clone()
                .map_err(AppError::Evaluation)
        }
    }
}
