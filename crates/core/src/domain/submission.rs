// Submission Domain Model

use super::error::{DomainError, Result as DomainResult};
use serde::{Deserialize, Serialize};

/// Problem identifier used by the evaluation service
pub type ProblemId = i64;

/// Row ID of a persisted submission
pub type SubmissionId = i64;

/// Estimated or official score ("dislikes"): lower is better, negative is invalid
pub type Score = i64;

/// Evaluation of a solution by the external scoring service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    pub score: Score,
    #[serde(default)]
    pub bonuses: String,
    #[serde(default)]
    pub obtained_bonuses: String,
    #[serde(default)]
    pub bonuses_hash: String,
}

impl Evaluation {
    pub fn is_valid(&self) -> bool {
        self.score >= 0
    }
}

/// Submission record to persist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    pub problem_id: ProblemId,
    pub data: String,
    pub bonuses: String,
    pub obtained_bonuses: String,
    pub bonuses_hash: String,
    pub estimated_score: Score,
    /// ID assigned by the official scoring service (final submissions only)
    #[serde(default)]
    pub pose_id: Option<String>,
    pub submitted_at: i64, // epoch ms
}

impl NewSubmission {
    pub fn from_evaluation(
        problem_id: ProblemId,
        data: impl Into<String>,
        evaluation: &Evaluation,
        submitted_at: i64,
    ) -> Self {
        Self {
            problem_id,
            data: data.into(),
            bonuses: evaluation.bonuses.clone(),
            obtained_bonuses: evaluation.obtained_bonuses.clone(),
            bonuses_hash: evaluation.bonuses_hash.clone(),
            estimated_score: evaluation.score,
            pose_id: None,
            submitted_at,
        }
    }

    pub fn with_pose_id(mut self, pose_id: impl Into<String>) -> Self {
        self.pose_id = Some(pose_id.into());
        self
    }
}

/// Vertex positions of a solution, as sent to the official scoring service
#[derive(Debug, Deserialize)]
struct Pose {
    vertices: Vec<Vec<i64>>,
}

/// Check that `solution` is a pose with at least one vertex.
///
/// Returns the number of vertices.
pub fn check_pose(solution: &str) -> DomainResult<usize> {
    let pose: Pose = serde_json::from_str(solution)
        .map_err(|e| DomainError::InvalidSolution(format!("failed to parse the solution: {}", e)))?;
    if pose.vertices.is_empty() {
        return Err(DomainError::InvalidSolution(
            "no vertices are provided".to_string(),
        ));
    }
    Ok(pose.vertices.len())
}

/// Result of a submit attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Persisted under the given ID
    Recorded(SubmissionId),
    /// Not persisted: the best official score is already at least as good
    Skipped { estimated: Score, best: Score },
}

/// Result of a final (official) submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalSubmitOutcome {
    pub submission_id: SubmissionId,
    pub pose_id: String,
}
