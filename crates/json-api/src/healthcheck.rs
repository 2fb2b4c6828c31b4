//! Shopfront JSON API Healthcheck Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::{extensions::*, state::State};

/// Healthcheck response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
}

/// Healthcheck handler
///
/// Returns `ok` while the store answers pings, `unavailable` with a 503 otherwise.
#[endpoint(
    tags("health"),
    summary = "Health check endpoint",
    responses(
        (status_code = StatusCode::OK, description = "Service healthy"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Store unreachable"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot, res: &mut Response) -> Json<HealthResponse> {
    let reachable = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state
            .app
            .ping()
            .await
            .inspect_err(|source| error!("store ping failed: {source}"))
            .is_ok(),
        Err(_missing) => false,
    };

    if !reachable {
        res.status_code(StatusCode::SERVICE_UNAVAILABLE);

        return Json(HealthResponse {
            status: "unavailable".to_string(),
        });
    }

    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
