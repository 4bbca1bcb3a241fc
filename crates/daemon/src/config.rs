//! Worker settings from environment variables

use anyhow::{bail, Context, Result};
use runner_core::application::worker::constants::DEFAULT_SHUTDOWN_MARKER;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_COORDINATOR_URL: &str = "http://127.0.0.1:9527";
pub const DEFAULT_SANDBOX_IMAGE: &str = "runner";

/// Which sandbox runtime executes runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SandboxKind {
    Docker,
    /// No isolation (development)
    Host,
}

impl FromStr for SandboxKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "docker" => Ok(SandboxKind::Docker),
            "host" => Ok(SandboxKind::Host),
            other => bail!("Unknown sandbox '{}' (expected docker or host)", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn from_env() -> Self {
        match std::env::var("RUNNER_LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub coordinator_url: String,
    pub shutdown_marker: PathBuf,
    pub sandbox: SandboxKind,
    pub sandbox_image: String,
    pub workspace_root: Option<PathBuf>,
}

impl WorkerSettings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key lookup (environment in production)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let expand = |path: String| PathBuf::from(shellexpand::tilde(&path).into_owned());

        let sandbox = match get("RUNNER_SANDBOX") {
            Some(value) => value.parse::<SandboxKind>().context("Invalid RUNNER_SANDBOX")?,
            None => SandboxKind::Docker,
        };

        Ok(Self {
            coordinator_url: get("RUNNER_COORDINATOR_URL")
                .unwrap_or_else(|| DEFAULT_COORDINATOR_URL.to_string()),
            shutdown_marker: expand(
                get("RUNNER_SHUTDOWN_MARKER").unwrap_or_else(|| DEFAULT_SHUTDOWN_MARKER.to_string()),
            ),
            sandbox,
            sandbox_image: get("RUNNER_SANDBOX_IMAGE")
                .unwrap_or_else(|| DEFAULT_SANDBOX_IMAGE.to_string()),
            workspace_root: get("RUNNER_WORKSPACE_ROOT").map(expand),
        })
    }
}
