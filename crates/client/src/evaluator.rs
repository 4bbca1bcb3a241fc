//! Evaluation service client: `ScoreEvaluator` over HTTP

use crate::error::{ClientError, Result};
use async_trait::async_trait;
use runner_core::domain::{Evaluation, ProblemId, Score};
use runner_core::port::ScoreEvaluator;
use serde::Deserialize;
use tracing::debug;

/// Response of `POST /api/evaluate`
#[derive(Debug, Deserialize)]
struct EvaluateResponse {
    dislikes: Score,
    #[serde(default)]
    bonuses: String,
    #[serde(default)]
    obtained_bonuses: String,
    #[serde(default)]
    bonuses_hash: String,
}

impl From<EvaluateResponse> for Evaluation {
    fn from(r: EvaluateResponse) -> Self {
        Evaluation {
            score: r.dislikes,
            bonuses: r.bonuses,
            obtained_bonuses: r.obtained_bonuses,
            bonuses_hash: r.bonuses_hash,
        }
    }
}

/// HTTP client for the evaluation service
pub struct HttpScoreEvaluator {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScoreEvaluator {
    /// `base_url` without trailing slash, e.g. `http://127.0.0.1:8080`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    async fn post_evaluate(&self, problem_id: ProblemId, solution: &str) -> Result<Evaluation> {
        let response = self
            .client
            .post(format!("{}/api/evaluate", self.base_url))
            .query(&[("problem_id", problem_id)])
            .body(solution.to_string())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: EvaluateResponse = response.json().await?;
        debug!(problem_id, dislikes = parsed.dislikes, "Evaluation received");
        Ok(parsed.into())
    }
}

#[async_trait]
impl ScoreEvaluator for HttpScoreEvaluator {
    async fn evaluate(&self, problem_id: ProblemId, solution: &str) -> runner_core::Result<Evaluation> {
        Ok(self.post_evaluate(problem_id, solution).await?)
    }
}
