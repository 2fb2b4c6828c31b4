//! Tracing subscriber setup.

use opentelemetry::trace::TracerProvider as _;
use opentelemetry_sdk::trace::SdkTracerProvider;
use tracing_subscriber::{
    EnvFilter, Registry,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::observability::{LogFormat, LoggingConfig};

use super::ObservabilityError;

/// Crates whose `info` output is mostly connection chatter.
const QUIET_CRATES: [&str; 5] = ["h2", "hyper", "tonic", "mongodb", "opentelemetry"];

pub(super) fn init_subscriber(
    logging: &LoggingConfig,
    service_name: &str,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(&logging.log_level)));

    match logging.log_format {
        LogFormat::Compact => init_with_layer(
            filter,
            tracing_subscriber::fmt::layer()
                .compact()
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
            service_name,
            tracer_provider,
        ),
        LogFormat::Json => init_with_layer(
            filter,
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(true)
                .with_target(true),
            service_name,
            tracer_provider,
        ),
    }
}

fn default_directives(level: &str) -> String {
    QUIET_CRATES
        .iter()
        .fold(level.to_owned(), |directives, krate| {
            format!("{directives},{krate}=warn")
        })
}

fn init_with_layer<L>(
    filter: EnvFilter,
    fmt_layer: L,
    service_name: &str,
    tracer_provider: Option<&SdkTracerProvider>,
) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    let subscriber = tracing_subscriber::registry().with(fmt_layer).with(filter);

    if let Some(tracer_provider) = tracer_provider {
        let tracer = tracer_provider.tracer(service_name.to_owned());

        subscriber
            .with(tracing_opentelemetry::layer().with_tracer(tracer))
            .try_init()?;
    } else {
        subscriber.try_init()?;
    }

    Ok(())
}
