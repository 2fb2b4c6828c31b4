//! Create Order Handler

use std::sync::Arc;

use salvo::prelude::*;
use tracing::info;

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{
        errors::into_api_error,
        models::{CreateOrderRequest, OrderResponse},
    },
    state::State,
};

/// Create Order Handler
///
/// The stored customer email is always the signed-in user's.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    request_body = CreateOrderRequest,
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Email does not match session"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.identity_or_401()?;
    let request = req
        .json_or_400::<CreateOrderRequest>(INVALID_BODY_MESSAGE)
        .await?;

    if let Some(email) = request.customer.email.as_deref()
        && !owner.matches(email)
    {
        return Err(ApiError::forbidden());
    }

    let order = state
        .app
        .orders
        .place_order(&owner, request.into())
        .await
        .map_err(into_api_error)?;

    info!(order_id = %order.id, total = order.total, "order created");

    res.status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
