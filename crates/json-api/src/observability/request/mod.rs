//! Request-level logging, request IDs, and parent trace extraction.

mod parent_context;
mod request_ids;
mod spans;

use std::time::{Duration, Instant};

use salvo::{
    Request, handler,
    prelude::{Depot, FlowCtrl, Response},
};
use tracing::Instrument as _;
use tracing::{error, info, warn};
use tracing_opentelemetry::OpenTelemetrySpanExt as _;

use super::metrics;

const REQUEST_ID_DEPOT_KEY: &str = "request_id";

/// Outermost hoop: request id, `http.request` span, metrics and outcome logging.
///
/// A remote parent is only joined when a W3C propagator has been installed, i.e. when trace
/// export is enabled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestLogging {
    slow_request_threshold: Duration,
}

impl RequestLogging {
    pub(crate) fn new(slow_request_threshold: Duration) -> Self {
        Self {
            slow_request_threshold,
        }
    }
}

#[handler]
impl RequestLogging {
    async fn handle(
        &self,
        req: &mut Request,
        depot: &mut Depot,
        res: &mut Response,
        ctrl: &mut FlowCtrl,
    ) {
        if req.uri().path() == "/metrics" {
            ctrl.call_next(req, depot, res).await;
            return;
        }

        let started = Instant::now();

        let request_id =
            request_ids::resolve_request_id(req.header::<String>(request_ids::REQUEST_ID_HEADER));

        depot.insert(REQUEST_ID_DEPOT_KEY, request_id.clone());

        request_ids::set_request_id_header(res, &request_id);

        let method = req.method().to_string();
        let path = req.uri().path().to_owned();
        let remote_addr = req.remote_addr().to_string();
        let names = spans::request_span_name(&method, &path);
        let route = names.route;
        let _in_flight_request = metrics::InFlightRequestGuard::track();

        let span = tracing::info_span!(
            parent: None,
            "http.request",
            otel.name = %names.otel_span_name,
            otel.kind = "server",
            request_id = %request_id,
            method = %method,
            path = %path,
            route = %route,
            remote_addr = %remote_addr,
            status = tracing::field::Empty,
            duration_ms = tracing::field::Empty
        );

        if let Some(parent_context) = parent_context::extract_parent_context(req.headers())
            && let Err(source) = span.set_parent(parent_context)
        {
            warn!("failed to set parent context on request span: {source}");
        }

        ctrl.call_next(req, depot, res)
            .instrument(span.clone())
            .await;

        let duration = started.elapsed();
        let status = request_ids::response_status_or_ok(res.status_code);
        let duration_ms = duration.as_millis();
        let threshold_ms = self.slow_request_threshold.as_millis();

        metrics::observe_request(&method, &route, status.as_u16(), duration.as_secs_f64());

        span.record("status", status.as_u16());
        span.record("duration_ms", duration_ms);

        span.in_scope(|| {
            info!(status = status.as_u16(), duration_ms, "request.completed");

            if status.is_server_error() {
                error!(
                    status = status.as_u16(),
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    "server error response"
                );
            } else if status.is_client_error() {
                warn!(
                    status = status.as_u16(),
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    "client error response"
                );
            }

            if duration > self.slow_request_threshold {
                warn!(
                    method = %method,
                    path = %path,
                    request_id = %request_id,
                    duration_ms,
                    threshold_ms,
                    "slow request detected"
                );
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use salvo::{Router, Service, prelude::StatusCode, test::TestClient};

    use super::*;

    #[handler]
    async fn ok(res: &mut Response) {
        res.render("ok");
    }

    fn service() -> Service {
        Service::new(
            Router::new()
                .hoop(RequestLogging::new(Duration::from_secs(1)))
                .push(Router::with_path("cart").get(ok)),
        )
    }

    #[tokio::test]
    async fn incoming_request_id_is_echoed() {
        let res = TestClient::get("http://example.com/cart")
            .add_header(request_ids::REQUEST_ID_HEADER, "req-123", true)
            .send(&service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            res.headers()
                .get(request_ids::REQUEST_ID_HEADER)
                .and_then(|value| value.to_str().ok()),
            Some("req-123")
        );
    }

    #[tokio::test]
    async fn missing_request_id_is_generated() {
        let res = TestClient::get("http://example.com/cart")
            .send(&service())
            .await;

        let generated = res
            .headers()
            .get(request_ids::REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();

        assert!(
            uuid::Uuid::parse_str(generated).is_ok(),
            "expected a generated uuid request id, got {generated:?}"
        );
    }
}
