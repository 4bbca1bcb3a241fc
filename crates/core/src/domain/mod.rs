// Domain Layer - Runs, results and submissions

pub mod error;
pub mod run;
pub mod submission;

// Re-exports
pub use error::DomainError;
pub use run::{Run, RunId, RunResult, RunSignature, EXECUTION_ERROR_EXIT_CODE, NO_RUN};
pub use submission::{
    check_pose, Evaluation, FinalSubmitOutcome, NewSubmission, ProblemId, Score, SubmissionId,
    SubmitOutcome,
};
