//! Telemetry lifecycle management.

use std::time::Duration;

use opentelemetry::{KeyValue, global};
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::{
    Resource,
    propagation::TraceContextPropagator,
    trace::{Sampler, SdkTracerProvider},
};
use tracing::{error, info};
use uuid::Uuid;

use crate::config::{ServerConfig, observability::ObservabilityConfig};

use super::{ObservabilityError, logging, request::RequestLogging};

/// Namespace shared by every shopfront service resource.
const SERVICE_NAMESPACE: &str = "shopfront";

/// Runtime observability state.
#[derive(Debug)]
pub(crate) struct Observability {
    tracer_provider: Option<SdkTracerProvider>,
    slow_request_threshold: Duration,
}

impl Observability {
    /// Install the subscriber and, when enabled, the OTLP span pipeline and W3C propagator.
    pub(crate) fn init(config: &ServerConfig) -> Result<Self, ObservabilityError> {
        let otel = &config.observability;

        let tracer_provider = if otel.otel_enabled {
            global::set_text_map_propagator(TraceContextPropagator::new());

            Some(tracer_provider(otel)?)
        } else {
            None
        };

        logging::init_subscriber(
            &config.logging,
            &otel.otel_service_name,
            tracer_provider.as_ref(),
        )?;

        if tracer_provider.is_some() {
            info!(
                endpoint = %otel.otel_exporter_otlp_endpoint,
                sample_ratio = sample_ratio(otel),
                "exporting traces over OTLP"
            );
        }

        Ok(Self {
            tracer_provider,
            slow_request_threshold: Duration::from_millis(otel.slow_request_threshold_ms),
        })
    }

    /// The request hoop, carrying this process's slow request threshold.
    pub(crate) fn request_logging(&self) -> RequestLogging {
        RequestLogging::new(self.slow_request_threshold)
    }

    /// Flush buffered spans and stop the exporter.
    pub(crate) fn shutdown(self) {
        let Some(provider) = self.tracer_provider else {
            return;
        };

        if let Err(source) = provider.shutdown() {
            error!("failed to shutdown tracer provider: {source}");
        }
    }
}

fn tracer_provider(config: &ObservabilityConfig) -> Result<SdkTracerProvider, ObservabilityError> {
    let exporter = opentelemetry_otlp::SpanExporter::builder()
        .with_tonic()
        .with_endpoint(config.otel_exporter_otlp_endpoint.clone())
        .with_timeout(Duration::from_secs(config.otel_exporter_otlp_timeout_seconds))
        .build()?;

    Ok(SdkTracerProvider::builder()
        .with_sampler(Sampler::ParentBased(Box::new(Sampler::TraceIdRatioBased(
            sample_ratio(config),
        ))))
        .with_resource(service_resource(config))
        .with_batch_exporter(exporter)
        .build())
}

/// Resource identifying this API process among the shopfront services.
fn service_resource(config: &ObservabilityConfig) -> Resource {
    Resource::builder_empty()
        .with_service_name(config.otel_service_name.clone())
        .with_attributes([
            KeyValue::new("service.namespace", SERVICE_NAMESPACE),
            KeyValue::new("service.version", config.otel_service_version.clone()),
            KeyValue::new("service.instance.id", Uuid::now_v7().to_string()),
            KeyValue::new(
                "deployment.environment.name",
                config.otel_deployment_environment.clone(),
            ),
        ])
        .build()
}

fn sample_ratio(config: &ObservabilityConfig) -> f64 {
    config.otel_trace_sample_ratio.clamp(0.0, 1.0)
}
