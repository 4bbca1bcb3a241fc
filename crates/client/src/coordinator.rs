//! Coordinator client: `LeaseClient` over JSON-RPC

use crate::error::{ClientError, Result};
use crate::types::{
    AckResponse, AcquireResponse, ExtendRequest, FlushRequest, METHOD_ACQUIRE, METHOD_EXTEND,
    METHOD_FLUSH,
};
use async_trait::async_trait;
use jsonrpsee::core::client::ClientT;
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use runner_core::domain::{Run, RunResult, RunSignature};
use runner_core::port::LeaseClient;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Coordinator client
///
/// One instance per worker; the underlying HTTP client pools connections.
pub struct CoordinatorClient {
    client: HttpClient,
    url: String,
}

impl CoordinatorClient {
    /// Build a client for the coordinator at `url` (e.g. `http://127.0.0.1:9527`).
    ///
    /// No request is sent until the first call.
    pub fn connect(url: impl AsRef<str>) -> Result<Self> {
        Self::connect_with_timeout(url, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn connect_with_timeout(url: impl AsRef<str>, timeout: Duration) -> Result<Self> {
        let url = url.as_ref();

        let client = HttpClientBuilder::default()
            .request_timeout(timeout)
            .build(url)
            .map_err(|e| ClientError::Connection(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn acquire_run(&self) -> Result<Run> {
        let response: AcquireResponse = self.client.request(METHOD_ACQUIRE, rpc_params![]).await?;
        debug!(run_id = response.run_id, "Acquire answered");
        Ok(response.into())
    }

    async fn extend_lease(&self, signature: &RunSignature) -> Result<()> {
        let params = rpc_params![ExtendRequest::from(signature)];
        let ack: AckResponse = self.client.request(METHOD_EXTEND, params).await?;
        if !ack.ok {
            return Err(ClientError::Rejected(format!("lease {} not extended", signature)));
        }
        Ok(())
    }

    async fn flush_result(&self, result: &RunResult) -> Result<()> {
        let params = rpc_params![FlushRequest::from(result)];
        let ack: AckResponse = self.client.request(METHOD_FLUSH, params).await?;
        if !ack.ok {
            return Err(ClientError::Rejected(format!(
                "result for {} not accepted",
                result.run_signature
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl LeaseClient for CoordinatorClient {
    async fn acquire(&self) -> runner_core::Result<Run> {
        Ok(self.acquire_run().await?)
    }

    async fn extend(&self, signature: &RunSignature) -> runner_core::Result<()> {
        Ok(self.extend_lease(signature).await?)
    }

    async fn flush(&self, result: &RunResult) -> runner_core::Result<()> {
        Ok(self.flush_result(result).await?)
    }
}
