//! Runner Worker - Main Entry Point
//! Leases runs from the coordinator and executes them in a sandbox

mod config;
mod telemetry;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{LogFormat, SandboxKind, WorkerSettings};
use runner_client::CoordinatorClient;
use runner_core::application::worker::{
    shutdown_channel, ShutdownReason, ShutdownSender, Worker, WorkerConfig,
};
use runner_core::port::id_provider::UuidProvider;
use runner_core::port::SandboxRuntime;
use runner_infra_system::{DockerSandbox, HostSandbox, ShutdownMarker};

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging() -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("runner=info"))
        .expect("Failed to create env filter");
    let otel = telemetry::otel_layer()?;

    match LogFormat::from_env() {
        LogFormat::Json => {
            // Production: JSON structured logging
            tracing_subscriber::registry()
                .with(env_filter)
                .with(otel)
                .with(fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            // Development: Pretty formatting with colors
            tracing_subscriber::registry()
                .with(env_filter)
                .with(otel)
                .with(fmt::layer().pretty())
                .init();
        }
    }

    if telemetry::endpoint_ignored() {
        warn!("OpenTelemetry endpoint set but feature 'telemetry' not enabled");
    }
    Ok(())
}

/// Forward SIGINT / SIGTERM to the shutdown token
fn spawn_signal_handler(shutdown: Arc<ShutdownSender>) {
    tokio::spawn(async move {
        #[cfg(unix)]
        {
            use tokio::signal::unix::{signal, SignalKind};
            let mut terminate = match signal(SignalKind::terminate()) {
                Ok(s) => s,
                Err(e) => {
                    error!(error = %e, "Failed to install SIGTERM handler");
                    return;
                }
            };
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {}
                _ = terminate.recv() => {}
            }
        }

        #[cfg(not(unix))]
        {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Failed to listen for Ctrl+C");
                return;
            }
        }

        info!("Shutdown signal received; finishing current iteration");
        shutdown.trigger(ShutdownReason::Signal);
    });
}

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize logging
    init_logging()?;
    info!("Runner worker v{} starting...", VERSION);

    // 2. Load configuration
    let settings = WorkerSettings::from_env().context("Invalid worker configuration")?;
    info!(
        coordinator = %settings.coordinator_url,
        sandbox = ?settings.sandbox,
        shutdown_marker = %settings.shutdown_marker.display(),
        "Configuration loaded"
    );

    // 3. Setup dependencies (DI wiring)
    let lease_client = Arc::new(
        CoordinatorClient::connect(&settings.coordinator_url)
            .context("Failed to create coordinator client")?,
    );
    let sandbox: Arc<dyn SandboxRuntime> = match settings.sandbox {
        SandboxKind::Docker => Arc::new(DockerSandbox::new(settings.sandbox_image.clone())),
        SandboxKind::Host => {
            warn!("Host sandbox selected: runs execute without isolation");
            Arc::new(HostSandbox::new())
        }
    };
    let config = WorkerConfig {
        workspace_root: settings.workspace_root.clone(),
        ..Default::default()
    };
    let worker = Worker::new(lease_client, sandbox, Arc::new(UuidProvider), config);

    // 4. Shutdown adapters: marker file and OS signals
    let (shutdown_tx, shutdown_rx) = shutdown_channel();
    let shutdown_tx = Arc::new(shutdown_tx);
    let marker = ShutdownMarker::new(&settings.shutdown_marker);
    marker.check(&shutdown_tx);
    let marker_handle = marker.spawn_watcher(Arc::clone(&shutdown_tx));
    spawn_signal_handler(Arc::clone(&shutdown_tx));

    // 5. Run until shutdown; the current iteration always completes
    info!("Press Ctrl+C or create the shutdown marker to stop");
    let result = worker.run(shutdown_rx).await;

    marker_handle.abort();
    result.context("Worker failed")?;

    info!("Shutdown complete.");
    Ok(())
}
