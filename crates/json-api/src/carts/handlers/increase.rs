//! Increase Cart Line Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use tracing::info;

use crate::{
    carts::errors::{parse_line_id, track_mutation},
    errors::ApiError,
    extensions::*,
    responses::SuccessResponse,
    state::State,
};

/// Increase Cart Line Handler
#[endpoint(
    tags("cart"),
    summary = "Increase Cart Line Quantity",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Quantity increased"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<SuccessResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.identity_or_401()?;
    let line = parse_line_id(&id.into_inner())?;

    let updated = track_mutation("increase", state.app.carts.increment(&owner, line).await)?;

    info!(cart_line = %line, quantity = updated.quantity, "increased cart line");

    Ok(Json(SuccessResponse::ok()))
}
