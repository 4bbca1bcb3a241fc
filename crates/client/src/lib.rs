//! Runner Client - Outbound adapters
//!
//! - [`CoordinatorClient`]: `LeaseClient` over JSON-RPC 2.0 / HTTP
//! - [`HttpScoreEvaluator`]: `ScoreEvaluator` over the evaluation service's REST API
//! - [`HttpOfficialSubmitter`]: `OfficialSubmitter` over the official scoring service
//!
//! ```no_run
//! use runner_client::CoordinatorClient;
//! use runner_core::port::LeaseClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = CoordinatorClient::connect("http://127.0.0.1:9527")?;
//! let run = client.acquire().await?;
//! println!("Acquired run {}", run.run_id);
//! # Ok(())
//! # }
//! ```

mod coordinator;
mod error;
mod evaluator;
mod official;
#[cfg(test)]
mod test_support;
pub mod types;

pub use coordinator::{CoordinatorClient, DEFAULT_REQUEST_TIMEOUT};
pub use error::{ClientError, Result};
pub use evaluator::HttpScoreEvaluator;
pub use official::HttpOfficialSubmitter;
