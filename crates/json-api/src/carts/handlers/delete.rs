//! Delete Cart Line Handler

use std::sync::Arc;

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    carts::errors::{parse_line_id, track_mutation},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// Cart Line Deleted Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineDeletedResponse {
    /// Always `true`
    pub deleted: bool,
}

/// Delete Cart Line Handler
#[endpoint(
    tags("cart"),
    summary = "Delete Cart Line",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart line deleted"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::NOT_FOUND, description = "Cart line not found"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.delete",
    skip(id, depot),
    fields(cart_line = tracing::field::Empty),
    err(Debug)
)]
pub(crate) async fn handler(
    id: PathParam<String>,
    depot: &mut Depot,
) -> Result<Json<CartLineDeletedResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.identity_or_401()?;
    let line = parse_line_id(&id.into_inner())?;

    tracing::Span::current().record("cart_line", tracing::field::display(line));

    track_mutation("delete", state.app.carts.remove_item(&owner, line).await)?;

    tracing::info!(cart_line = %line, "deleted cart line");

    Ok(Json(CartLineDeletedResponse { deleted: true }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use shopfront_app::domain::carts::{CartsServiceError, MockCartsService, models::CartLineId};
    use testresult::TestResult;

    use crate::test_helpers::carts_service;

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/delete/{id}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_line_success() -> TestResult {
        let id = CartLineId::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .withf(move |_, line| *line == id)
            .return_once(|_, _| Ok(()));

        let mut res = TestClient::delete(format!("http://example.com/cart/delete/{id}"))
            .send(&make_service(carts))
            .await;

        let body: CartLineDeletedResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(body.deleted);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_invalid_id_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_remove_item().never();

        let res = TestClient::delete("http://example.com/cart/delete/123")
            .send(&make_service(carts))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unknown_line_returns_404() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_remove_item()
            .once()
            .return_once(|_, _| Err(CartsServiceError::NotFound));

        let res = TestClient::delete(format!(
            "http://example.com/cart/delete/{}",
            CartLineId::new()
        ))
        .send(&make_service(carts))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
