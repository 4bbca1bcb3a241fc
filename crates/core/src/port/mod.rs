// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod lease_client;
pub mod official_submitter;
pub mod sandbox;
pub mod score_evaluator;
pub mod submission_repository;
pub mod time_provider;

// Re-exports
pub use id_provider::IdProvider;
pub use lease_client::LeaseClient;
pub use official_submitter::OfficialSubmitter;
pub use sandbox::{ExecutionError, InstanceName, SandboxLaunch, SandboxRuntime};
pub use score_evaluator::ScoreEvaluator;
pub use submission_repository::{BestScores, SubmissionRepository};
pub use time_provider::TimeProvider;
