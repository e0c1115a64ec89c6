//! OpenTelemetry tracing setup shared by both services.
//!
//! Spans are exported over OTLP in batches; export problems are reported on
//! stderr at shutdown and never fail a request.

use anyhow::{Context, Result};
use opentelemetry::KeyValue;
use opentelemetry::trace::TracerProvider;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::propagation::TraceContextPropagator;
use opentelemetry_sdk::{
    Resource, runtime,
    trace::{self, RandomIdGenerator, Sampler},
};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Owns the tracer provider; dropping it flushes pending spans and shuts
/// the exporter down. Hold it for the lifetime of `main`.
pub struct TelemetryGuard {
    provider: opentelemetry_sdk::trace::TracerProvider,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Err(err) = self.provider.shutdown() {
            eprintln!("error shutting down tracer provider: {err:?}");
        }
    }
}

/// Initialize tracing for a service: W3C trace-context propagation, a
/// batched OTLP span exporter, and a console log subscriber.
///
/// Must run inside a Tokio runtime (the batch exporter uses it).
pub fn init(service_name: &str, otlp_endpoint: &str) -> Result<TelemetryGuard> {
    opentelemetry::global::set_text_map_propagator(TraceContextPropagator::new());

    let exporter = opentelemetry_otlp::new_exporter()
        .tonic()
        .with_endpoint(otlp_endpoint);

    let provider = opentelemetry_otlp::new_pipeline()
        .tracing()
        .with_exporter(exporter)
        .with_trace_config(
            trace::Config::default()
                .with_sampler(Sampler::AlwaysOn)
                .with_id_generator(RandomIdGenerator::default())
                .with_resource(Resource::new(vec![
                    KeyValue::new("service.name", service_name.to_string()),
                    KeyValue::new("service.version", env!("CARGO_PKG_VERSION")),
                ])),
        )
        .install_batch(runtime::Tokio)
        .context("Failed to install OTLP tracing pipeline")?;

    let tracer = provider.tracer(service_name.to_string());
    let otel_layer = tracing_opentelemetry::layer().with_tracer(tracer);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(otel_layer)
        .with(fmt_layer)
        .try_init()
        .context("Failed to install tracing subscriber")?;

    tracing::info!(
        service = service_name,
        otlp_endpoint,
        "telemetry initialized"
    );

    Ok(TelemetryGuard { provider })
}
