// Submission Service - Evaluate, record and officially submit solutions

pub mod final_submit;
pub mod submit;

#[cfg(test)]
mod submit_test;

pub use final_submit::FinalSubmitRequest;
pub use submit::SubmitRequest;

use crate::domain::{FinalSubmitOutcome, ProblemId, Score, SubmissionId, SubmitOutcome};
use crate::error::{AppError, Result};
use crate::port::{
    BestScores, OfficialSubmitter, ScoreEvaluator, SubmissionRepository, TimeProvider,
};
use std::sync::Arc;
use tracing::info;

/// Submission Service
pub struct SubmissionService {
    evaluator: Arc<dyn ScoreEvaluator>,
    submission_repo: Arc<dyn SubmissionRepository>,
    time_provider: Arc<dyn TimeProvider>,
    official: Option<Arc<dyn OfficialSubmitter>>,
}

impl SubmissionService {
    pub fn new(
        evaluator: Arc<dyn ScoreEvaluator>,
        submission_repo: Arc<dyn SubmissionRepository>,
        time_provider: Arc<dyn TimeProvider>,
    ) -> Self {
        Self {
            evaluator,
            submission_repo,
            time_provider,
            official: None,
        }
    }

    /// Enable final submissions through `official`
    pub fn with_official_submitter(mut self, official: Arc<dyn OfficialSubmitter>) -> Self {
        self.official = Some(official);
        self
    }

    /// Evaluate a solution and record it unless a better official score exists
    pub async fn submit(&self, req: SubmitRequest) -> Result<SubmitOutcome> {
        submit::execute(
            self.evaluator.as_ref(),
            self.submission_repo.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Evaluate a solution, forward it to the official service and record it
    pub async fn final_submit(&self, req: FinalSubmitRequest) -> Result<FinalSubmitOutcome> {
        let official = self.official.as_deref().ok_or_else(|| {
            AppError::Config("official submission service is not configured".to_string())
        })?;

        final_submit::execute(
            self.evaluator.as_ref(),
            official,
            self.submission_repo.as_ref(),
            self.time_provider.as_ref(),
            req,
        )
        .await
    }

    /// Record the score the official service assigned to a submission
    pub async fn record_official_score(&self, id: SubmissionId, score: Score) -> Result<()> {
        if id <= 0 {
            return Err(AppError::Validation(format!(
                "submission_id must be positive, got {}",
                id
            )));
        }
        self.submission_repo.set_official_score(id, score).await?;
        info!(submission_id = id, score, "Official score recorded");
        Ok(())
    }

    /// Best known scores for a problem and bonus set
    pub async fn best_scores(&self, problem_id: ProblemId, bonuses_hash: &str) -> Result<BestScores> {
        self.submission_repo
            .best_scores(problem_id, bonuses_hash)
            .await
    }
}
