//! Prometheus metrics collection and exposition endpoint.

use std::sync::OnceLock;

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, IntGauge, Opts, Registry, TextEncoder,
    core::Collector,
};
use salvo::{
    Request, Response, handler,
    http::{
        StatusCode,
        header::{CONTENT_TYPE, HeaderValue},
    },
};
use tracing::error;

#[derive(Debug)]
struct ApiMetrics {
    registry: Registry,
    requests_total: IntCounterVec,
    request_duration_seconds: HistogramVec,
    requests_in_flight: IntGauge,
    auth_rejections_total: IntCounterVec,
    cart_mutations_total: IntCounterVec,
}

static API_METRICS: OnceLock<Option<ApiMetrics>> = OnceLock::new();

#[derive(Debug)]
pub(super) struct InFlightRequestGuard {
    tracked: bool,
}

impl InFlightRequestGuard {
    pub(super) fn track() -> Self {
        if let Some(metrics) = metrics() {
            metrics.requests_in_flight.inc();
            return Self { tracked: true };
        }

        Self { tracked: false }
    }
}

impl Drop for InFlightRequestGuard {
    fn drop(&mut self) {
        if self.tracked
            && let Some(metrics) = metrics()
        {
            metrics.requests_in_flight.dec();
        }
    }
}

pub(super) fn observe_request(method: &str, route: &str, status_code: u16, duration_seconds: f64) {
    let Some(metrics) = metrics() else {
        return;
    };

    let status_class = status_class(status_code);
    let status_code = status_code.to_string();

    metrics
        .requests_total
        .with_label_values(&[method, route, status_class, status_code.as_str()])
        .inc();

    metrics
        .request_duration_seconds
        .with_label_values(&[method, route])
        .observe(duration_seconds);
}

/// Count a request turned away by the session guard or the refresh endpoint.
pub(crate) fn record_auth_rejection(reason: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .auth_rejections_total
            .with_label_values(&[reason])
            .inc();
    }
}

/// Count a cart mutation by operation and outcome (`ok` or an error code).
pub(crate) fn record_cart_mutation(operation: &str, outcome: &str) {
    if let Some(metrics) = metrics() {
        metrics
            .cart_mutations_total
            .with_label_values(&[operation, outcome])
            .inc();
    }
}

#[handler]
pub(crate) async fn metrics_handler(_req: &mut Request, res: &mut Response) {
    let Some(metrics) = metrics() else {
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);
        return;
    };

    let encoder = TextEncoder::new();
    let metric_families = metrics.registry.gather();

    let mut encoded = Vec::new();

    if let Err(source) = encoder.encode(&metric_families, &mut encoded) {
        error!("failed to encode metrics response: {source}");
        res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

        return;
    }

    let content_type = match HeaderValue::from_str(encoder.format_type()) {
        Ok(value) => value,
        Err(source) => {
            error!("failed to encode metrics content type header: {source}");
            res.status_code(StatusCode::INTERNAL_SERVER_ERROR);

            return;
        }
    };

    res.headers_mut().insert(CONTENT_TYPE, content_type);
    res.render(String::from_utf8_lossy(&encoded).into_owned());
}

fn metrics() -> Option<&'static ApiMetrics> {
    API_METRICS.get_or_init(build_metrics).as_ref()
}

fn counter(name: &str, help: &str, labels: &[&str]) -> Option<IntCounterVec> {
    IntCounterVec::new(Opts::new(name, help), labels)
        .inspect_err(|source| error!("failed to create {name} metric: {source}"))
        .ok()
}

fn register<C>(registry: &Registry, name: &str, collector: &C) -> Option<()>
where
    C: Collector + Clone + 'static,
{
    registry
        .register(Box::new(collector.clone()))
        .inspect_err(|source| error!("failed to register {name} metric: {source}"))
        .ok()
}

fn build_metrics() -> Option<ApiMetrics> {
    let registry = Registry::new();

    let requests_total = counter(
        "shopfront_json_http_requests_total",
        "Total HTTP requests partitioned by method, route, status class, and status code.",
        &["method", "route", "status_class", "status_code"],
    )?;

    let request_duration_seconds = HistogramVec::new(
        HistogramOpts::new(
            "shopfront_json_http_request_duration_seconds",
            "HTTP request duration in seconds partitioned by method and route.",
        )
        .buckets(vec![
            0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
        ]),
        &["method", "route"],
    )
    .inspect_err(|source| error!("failed to create request_duration metric: {source}"))
    .ok()?;

    let requests_in_flight = IntGauge::with_opts(Opts::new(
        "shopfront_json_http_requests_in_flight",
        "Current number of in-flight HTTP requests.",
    ))
    .inspect_err(|source| error!("failed to create in-flight gauge metric: {source}"))
    .ok()?;

    let auth_rejections_total = counter(
        "shopfront_json_auth_rejections_total",
        "Requests refused for a missing, malformed, forged or expired token.",
        &["reason"],
    )?;

    let cart_mutations_total = counter(
        "shopfront_json_cart_mutations_total",
        "Cart mutations partitioned by operation and outcome.",
        &["operation", "outcome"],
    )?;

    register(&registry, "requests_total", &requests_total)?;
    register(&registry, "request_duration", &request_duration_seconds)?;
    register(&registry, "in-flight gauge", &requests_in_flight)?;
    register(&registry, "auth_rejections_total", &auth_rejections_total)?;
    register(&registry, "cart_mutations_total", &cart_mutations_total)?;

    Some(ApiMetrics {
        registry,
        requests_total,
        request_duration_seconds,
        requests_in_flight,
        auth_rejections_total,
        cart_mutations_total,
    })
}

fn status_class(status_code: u16) -> &'static str {
    match status_code {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}
