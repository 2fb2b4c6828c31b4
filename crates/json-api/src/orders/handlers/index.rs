//! User Orders Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    errors::ApiError,
    extensions::*,
    orders::{errors::into_api_error, models::OrderResponse},
    state::State,
};

/// User Orders Handler
///
/// Orders placed by the signed-in user, newest first.
#[endpoint(
    tags("orders"),
    summary = "List User Orders",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Orders"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.identity_or_401()?;

    let orders = state
        .app
        .orders
        .orders_for(&owner)
        .await
        .map_err(into_api_error)?;

    Ok(Json(orders.into_iter().map(OrderResponse::from).collect()))
}
