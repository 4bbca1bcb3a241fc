// Docker sandbox: `docker run --rm --name <instance> <image> bash -c <command>`
use async_trait::async_trait;
use std::path::Path;
use tracing::info;

use runner_core::application::worker::constants::LIVENESS_MARKER;
use runner_core::port::{ExecutionError, InstanceName, SandboxLaunch, SandboxRuntime};

use crate::process::{run_helper, spawn_and_wait};

pub const DEFAULT_DOCKER_BINARY: &str = "docker";
pub const DEFAULT_IMAGE: &str = "runner";

/// Container runtime driven through the docker CLI.
///
/// The CLI process runs in the workspace directory and its streams are the
/// workspace files; the container itself sees none of the workspace.
#[derive(Debug, Clone)]
pub struct DockerSandbox {
    docker: String,
    image: String,
}

impl DockerSandbox {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            docker: DEFAULT_DOCKER_BINARY.to_string(),
            image: image.into(),
        }
    }

    /// Override the docker binary (e.g. `podman`)
    pub fn with_binary(mut self, docker: impl Into<String>) -> Self {
        self.docker = docker.into();
        self
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    fn run_args<'a>(&'a self, instance: &'a str, command: &'a str) -> Vec<&'a str> {
        vec![
            "run", "--rm", "--name", instance, self.image.as_str(), "bash", "-c", command,
        ]
    }

    fn liveness_path() -> String {
        format!("/{}", LIVENESS_MARKER)
    }
}

impl Default for DockerSandbox {
    fn default() -> Self {
        Self::new(DEFAULT_IMAGE)
    }
}

#[async_trait]
impl SandboxRuntime for DockerSandbox {
    async fn run(&self, launch: SandboxLaunch) -> Result<i64, ExecutionError> {
        info!(
            instance = %launch.instance,
            image = %self.image,
            working_dir = %launch.working_dir.display(),
            "Starting container"
        );
        let instance = launch.instance.as_str().to_string();
        let command = launch.command.clone();
        let args = self.run_args(&instance, &command);
        spawn_and_wait(&self.docker, &args, launch).await
    }

    /// `docker exec <instance> touch /watchdog`
    async fn signal_liveness(
        &self,
        instance: &InstanceName,
        _working_dir: &Path,
    ) -> Result<(), ExecutionError> {
        let marker = Self::liveness_path();
        run_helper(&self.docker, &["exec", instance.as_str(), "touch", marker.as_str()]).await
    }

    fn name(&self) -> &'static str {
        "docker"
    }
}
