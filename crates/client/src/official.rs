//! Official scoring service client: `OfficialSubmitter` over HTTP

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use runner_core::domain::ProblemId;
use runner_core::port::OfficialSubmitter;
use runner_core::AppError;
use serde::Deserialize;
use tracing::{debug, info};

/// Response of `POST /api/problems/{id}/solutions`
#[derive(Debug, Deserialize)]
struct SolutionResponse {
    id: String,
}

/// HTTP client for the official scoring service
pub struct HttpOfficialSubmitter {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl HttpOfficialSubmitter {
    /// `base_url` without trailing slash; `api_key` is sent as a bearer token
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            api_key,
        }
    }

    async fn post_solution(&self, problem_id: ProblemId, solution: &str) -> Result<String> {
        let mut request = self
            .client
            .post(format!("{}/api/problems/{}/solutions", self.base_url, problem_id))
            .header(CONTENT_TYPE, "application/json")
            .body(solution.to_string());
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(problem_id, status = status.as_u16(), body = %body, "Official service response");

        if !status.is_success() {
            return Err(ClientError::Official {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SolutionResponse = serde_json::from_str(&body)?;
        info!(problem_id, pose_id = %parsed.id, "Solution accepted by the official service");
        Ok(parsed.id)
    }
}

#[async_trait]
impl OfficialSubmitter for HttpOfficialSubmitter {
    async fn submit(&self, problem_id: ProblemId, solution: &str) -> runner_core::Result<String> {
        self.post_solution(problem_id, solution)
            .await
            .map_err(|e| AppError::OfficialSubmission(e.to_string()))
    }
}
