//! Update Cart Line Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    carts::{
        errors::{parse_line_id, track_mutation},
        models::CartLineResponse,
    },
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Update Cart Line Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateCartLineRequest {
    /// New quantity, at least 1
    pub quantity: i64,
}

/// Update Cart Line Handler
///
/// Served for both `PATCH` and `PUT`.
#[endpoint(
    tags("cart"),
    summary = "Set Cart Line Quantity",
    request_body = UpdateCartLineRequest,
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart line updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.update",
    skip(id, req, depot),
    fields(cart_line = tracing::field::Empty),
    err(Debug)
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<CartLineResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.identity_or_401()?;
    let line = parse_line_id(&id.into_inner())?;
    let request = req
        .json_or_400::<UpdateCartLineRequest>(INVALID_BODY_MESSAGE)
        .await?;

    tracing::Span::current().record("cart_line", tracing::field::display(line));

    let updated = track_mutation(
        "update",
        state
            .app
            .carts
            .set_quantity(&owner, line, request.quantity)
            .await,
    )?;

    Ok(Json(updated.into()))
}
