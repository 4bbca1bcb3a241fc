// Runner Infrastructure - System Adapters
// Implements: SandboxRuntime (docker, host), shutdown marker watcher

pub mod docker_sandbox;
pub mod host_sandbox;
pub mod process;
pub mod shutdown_marker;

pub use docker_sandbox::DockerSandbox;
pub use host_sandbox::HostSandbox;
pub use shutdown_marker::ShutdownMarker;
