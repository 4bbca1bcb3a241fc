//! Client Error Types

use runner_core::AppError;
use thiserror::Error;

/// Client Result type
pub type Result<T> = std::result::Result<T, ClientError>;

/// Client Error
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("RPC error ({code}): {message}")]
    Rpc { code: i32, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    /// The coordinator answered but declined the request
    #[error("Rejected by coordinator: {0}")]
    Rejected(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Evaluation service error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("Official scoring service error ({status}): {body}")]
    Official { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Other error: {0}")]
    Other(String),
}

impl From<jsonrpsee::core::ClientError> for ClientError {
    fn from(e: jsonrpsee::core::ClientError) -> Self {
        match e {
            jsonrpsee::core::ClientError::Call(call_err) => ClientError::Rpc {
                code: call_err.code(),
                message: call_err.message().to_string(),
            },
            jsonrpsee::core::ClientError::Transport(e) => ClientError::Transport(e.to_string()),
            jsonrpsee::core::ClientError::RestartNeeded(_) => {
                ClientError::Connection("Connection restart needed".to_string())
            }
            jsonrpsee::core::ClientError::ParseError(e) => ClientError::Serialization(e),
            jsonrpsee::core::ClientError::RequestTimeout => {
                ClientError::Transport("Request timed out".to_string())
            }
            _ => ClientError::Other(e.to_string()),
        }
    }
}

impl From<ClientError> for AppError {
    fn from(e: ClientError) -> Self {
        match e {
            ClientError::Http(_) | ClientError::Api { .. } => AppError::Evaluation(e.to_string()),
            ClientError::Official { .. } => AppError::OfficialSubmission(e.to_string()),
            ClientError::Serialization(e) => AppError::Serialization(e),
            other => AppError::Coordinator(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_evaluation() {
        let err: AppError = ClientError::Api {
            status: 503,
            body: "busy".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Evaluation(msg) if msg.contains("503")));
    }

    #[test]
    fn test_rpc_error_maps_to_coordinator() {
        let err: AppError = ClientError::Rpc {
            code: 4001,
            message: "unknown signature".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Coordinator(msg) if msg.contains("unknown signature")));
    }
}
