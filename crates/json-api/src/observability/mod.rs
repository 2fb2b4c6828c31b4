//! Logging, request spans, Prometheus metrics and optional OTLP trace export.

use thiserror::Error;

mod init;
mod logging;
mod metrics;
mod request;

pub(crate) use init::Observability;
pub(crate) use metrics::{metrics_handler, record_auth_rejection, record_cart_mutation};

/// Errors raised while initialising observability.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    /// The OTLP span exporter could not be built.
    #[error("failed to build OTLP exporter: {0}")]
    OtlpExporter(#[from] opentelemetry_otlp::ExporterBuildError),

    /// A global subscriber was already installed.
    #[error("failed to initialise tracing subscriber: {0}")]
    TracingSubscriber(#[from] tracing_subscriber::util::TryInitError),
}
