// Final Submit Use Case

use super::submit::{evaluate_valid, validate_payload};
use crate::domain::{check_pose, FinalSubmitOutcome, NewSubmission, ProblemId};
use crate::error::Result;
use crate::port::{OfficialSubmitter, ScoreEvaluator, SubmissionRepository, TimeProvider};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Final submit request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalSubmitRequest {
    pub problem_id: ProblemId,
    pub solution: String,
}

/// Validate a final submit request (the solution must carry vertices)
pub fn validate_request(req: &FinalSubmitRequest) -> Result<usize> {
    validate_payload(req.problem_id, &req.solution)?;
    Ok(check_pose(&req.solution)?)
}

/// Execute final submit use case
///
/// Evaluates the solution, forwards it to the official scoring service and
/// records it together with the returned pose ID. Nothing is recorded when
/// the official service rejects the solution.
pub async fn execute(
    evaluator: &dyn ScoreEvaluator,
    official: &dyn OfficialSubmitter,
    submission_repo: &dyn SubmissionRepository,
    time_provider: &dyn TimeProvider,
    req: FinalSubmitRequest,
) -> Result<FinalSubmitOutcome> {
    let vertices = validate_request(&req)?;

    let evaluation = evaluate_valid(evaluator, req.problem_id, &req.solution).await?;
    info!(
        problem_id = req.problem_id,
        estimated = evaluation.score,
        vertices,
        "Submitting solution to the official service"
    );

    let pose_id = match official.submit(req.problem_id, &req.solution).await {
        Ok(pose_id) => pose_id,
        Err(e) => {
            warn!(problem_id = req.problem_id, error = %e, "Official submission failed");
            return Err(e);
        }
    };

    let submission = NewSubmission::from_evaluation(
        req.problem_id,
        req.solution,
        &evaluation,
        time_provider.now_millis(),
    )
    .with_pose_id(pose_id.clone());
    let submission_id = submission_repo.insert(&submission).await?;
    info!(
        problem_id = submission.problem_id,
        submission_id,
        pose_id = %pose_id,
        "Final submission recorded"
    );

    Ok(FinalSubmitOutcome {
        submission_id,
        pose_id,
    })
}
