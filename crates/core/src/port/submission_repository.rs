// Submission Repository Port (Interface)

use crate::domain::{NewSubmission, ProblemId, Score, SubmissionId};
use crate::error::Result;
use async_trait::async_trait;

/// Best known scores for a problem (None = nothing recorded yet)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BestScores {
    /// Best official score for the same bonus set
    pub official: Option<Score>,
    /// Best estimated score for the same bonus set
    pub estimated: Option<Score>,
    /// Best estimated score across all bonus sets
    pub overall_estimated: Option<Score>,
}

/// Repository interface for submission records
#[async_trait]
pub trait SubmissionRepository: Send + Sync {
    /// Best-known-score lookup for `(problem_id, bonuses_hash)`
    async fn best_scores(&self, problem_id: ProblemId, bonuses_hash: &str) -> Result<BestScores>;

    /// Persist a submission record
    async fn insert(&self, submission: &NewSubmission) -> Result<SubmissionId>;

    /// Record the official score of a judged submission
    ///
    /// # Errors
    /// - AppError::Database if no submission has this ID
    async fn set_official_score(&self, id: SubmissionId, score: Score) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::{Arc, Mutex};

    struct Row {
        id: SubmissionId,
        submission: NewSubmission,
        official_score: Option<Score>,
    }

    /// In-memory repository
    #[derive(Default)]
    pub struct InMemorySubmissionRepository {
        rows: Arc<Mutex<Vec<Row>>>,
    }

    impl InMemorySubmissionRepository {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn count(&self) -> usize {
            self.rows.lock().unwrap().len()
        }

        pub fn get(&self, id: SubmissionId) -> Option<NewSubmission> {
            self.rows
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .map(|r| r.submission.clone())
        }
    }

    #[async_trait]
    impl SubmissionRepository for InMemorySubmissionRepository {
        async fn best_scores(
            &self,
            problem_id: ProblemId,
            bonuses_hash: &str,
        ) -> Result<BestScores> {
            let rows = self.rows.lock().unwrap();
            let for_problem = rows.iter().filter(|r| r.submission.problem_id == problem_id);
            let same_bonuses = || {
                for_problem
                    .clone()
                    .filter(|r| r.submission.bonuses_hash == bonuses_hash)
            };

            Ok(BestScores {
                official: same_bonuses()
                    .filter_map(|r| r.official_score)
                    .filter(|s| *s >= 0)
                    .min(),
                estimated: same_bonuses()
                    .map(|r| r.submission.estimated_score)
                    .filter(|s| *s >= 0)
                    .min(),
                overall_estimated: for_problem
                    .clone()
                    .map(|r| r.submission.estimated_score)
                    .filter(|s| *s >= 0)
                    .min(),
            })
        }

        async fn insert(&self, submission: &NewSubmission) -> Result<SubmissionId> {
            let mut rows = self.rows.lock().unwrap();
            let id = rows.len() as SubmissionId + 1;
            rows.push(Row {
                id,
                submission: submission.clone(),
                official_score: None,
            });
            Ok(id)
        }

        async fn set_official_score(&self, id: SubmissionId, score: Score) -> Result<()> {
            let mut rows = self.rows.lock().unwrap();
            match rows.iter_mut().find(|r| r.id == id) {
                Some(row) => {
                    row.official_score = Some(score);
                    Ok(())
                }
                None => Err(AppError::Database(format!("Submission {} not found", id))),
            }
        }
    }
}
