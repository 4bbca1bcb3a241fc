// Submit Use Case

use crate::domain::{DomainError, Evaluation, NewSubmission, ProblemId, SubmitOutcome};
use crate::error::{AppError, Result};
use crate::port::{ScoreEvaluator, SubmissionRepository, TimeProvider};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Submit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub problem_id: ProblemId,
    pub solution: String,

    /// Record even if a better official score is known
    #[serde(default)]
    pub force: bool,
}

/// Validate a submit request before calling the evaluator
pub fn validate_request(req: &SubmitRequest) -> Result<()> {
    validate_payload(req.problem_id, &req.solution)
}

pub(super) fn validate_payload(problem_id: ProblemId, solution: &str) -> Result<()> {
    if problem_id <= 0 {
        return Err(AppError::Validation(format!(
            "problem_id must be positive, got {}",
            problem_id
        )));
    }
    if solution.trim().is_empty() {
        return Err(AppError::Validation("solution cannot be empty".to_string()));
    }
    Ok(())
}

/// Evaluate `solution`, rejecting negative scores
pub(super) async fn evaluate_valid(
    evaluator: &dyn ScoreEvaluator,
    problem_id: ProblemId,
    solution: &str,
) -> Result<Evaluation> {
    let evaluation = evaluator.evaluate(problem_id, solution).await?;
    if !evaluation.is_valid() {
        return Err(DomainError::InvalidSolution(format!(
            "problem {} scored {}",
            problem_id, evaluation.score
        ))
        .into());
    }
    Ok(evaluation)
}

/// Execute submit use case
///
/// # Arguments
///
/// * `evaluator` - Scoring service
/// * `submission_repo` - Submission store
/// * `time_provider` - Time provider (injected for determinism)
/// * `req` - Submit request
pub async fn execute(
    evaluator: &dyn ScoreEvaluator,
    submission_repo: &dyn SubmissionRepository,
    time_provider: &dyn TimeProvider,
    req: SubmitRequest,
) -> Result<SubmitOutcome> {
    validate_request(&req)?;

    let evaluation = evaluate_valid(evaluator, req.problem_id, &req.solution).await?;

    let best = submission_repo
        .best_scores(req.problem_id, &evaluation.bonuses_hash)
        .await?;
    info!(
        problem_id = req.problem_id,
        estimated = evaluation.score,
        best_official = ?best.official,
        best_estimated = ?best.estimated,
        best_overall = ?best.overall_estimated,
        "Solution evaluated"
    );

    if !req.force {
        if let Some(official) = best.official {
            if official <= evaluation.score {
                info!(
                    problem_id = req.problem_id,
                    estimated = evaluation.score,
                    official,
                    "Skipping submission: official score is already at least as good"
                );
                return Ok(SubmitOutcome::Skipped {
                    estimated: evaluation.score,
                    best: official,
                });
            }
        }
    }

    let submission = NewSubmission::from_evaluation(
        req.problem_id,
        req.solution,
        &evaluation,
        time_provider.now_millis(),
    );
    let id = submission_repo.insert(&submission).await?;
    info!(problem_id = submission.problem_id, submission_id = id, "Submission recorded");

    Ok(SubmitOutcome::Recorded(id))
}
