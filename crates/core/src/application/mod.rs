// Application Layer - Use Cases and Business Logic

pub mod submission;
pub mod summary;
pub mod worker;

// Re-exports
pub use submission::{FinalSubmitRequest, SubmissionService, SubmitRequest};
pub use worker::{
    shutdown_channel, IterationOutcome, ShutdownReason, ShutdownSender, ShutdownToken, Worker,
    WorkerConfig,
};
