//! Telemetry setup for OpenTelemetry integration

use anyhow::Result;
use tracing::Subscriber;
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::Layer;

/// Boxed layer added to the subscriber stack when OpenTelemetry is enabled
pub type OtelLayer<S> = Box<dyn Layer<S> + Send + Sync + 'static>;

/// Build the OpenTelemetry layer if enabled
///
/// # Environment Variables
///
/// - `OTEL_EXPORTER_OTLP_ENDPOINT`: OTLP endpoint (e.g., http://localhost:4317)
/// - `OTEL_SERVICE_NAME`: Service name (default: runner-worker)
///
/// # Example
///
/// ```text
/// OTEL_EXPORTER_OTLP_ENDPOINT=http://localhost:4317 \
/// OTEL_SERVICE_NAME=runner-dev \
///     ./runner-worker
/// ```
pub fn otel_layer<S>() -> Result<Option<OtelLayer<S>>>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    // Check if OpenTelemetry is configured
    if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_err() {
        return Ok(None);
    }

    #[cfg(feature = "telemetry")]
    {
        otel_layer_impl().map(Some)
    }

    #[cfg(not(feature = "telemetry"))]
    {
        // Logged once the subscriber is up
        Ok(None)
    }
}

/// OTLP endpoint configured but support not compiled in
pub fn endpoint_ignored() -> bool {
    cfg!(not(feature = "telemetry")) && std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok()
}

#[cfg(feature = "telemetry")]
fn otel_layer_impl<S>() -> Result<OtelLayer<S>>
where
    S: Subscriber + for<'a> LookupSpan<'a> + 'static,
{
    use opentelemetry::trace::TracerProvider as _;
    use opentelemetry::KeyValue;
    use opentelemetry_otlp::WithExportConfig;
    use opentelemetry_sdk::trace::TracerProvider;
    use opentelemetry_sdk::Resource;

    let service_name =
        std::env::var("OTEL_SERVICE_NAME").unwrap_or_else(|_| "runner-worker".to_string());
    let endpoint = std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")?;

    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(endpoint)
        .build()?;

    let provider = TracerProvider::builder()
        .with_batch_exporter(exporter, opentelemetry_sdk::runtime::Tokio)
        .with_resource(Resource::new(vec![KeyValue::new(
            "service.name",
            service_name.clone(),
        )]))
        .build();
    let tracer = provider.tracer(service_name);
    opentelemetry::global::set_tracer_provider(provider);

    Ok(tracing_opentelemetry::layer().with_tracer(tracer).boxed())
}
