//! List Cart Handler

use std::sync::Arc;

use salvo::prelude::*;

use crate::{
    carts::{errors::into_api_error, models::CartLineResponse},
    errors::ApiError,
    extensions::*,
    state::State,
};

/// List Cart Handler
///
/// Every line in the caller's cart, newest first.
#[endpoint(
    tags("cart"),
    summary = "List Cart",
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart lines"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<Vec<CartLineResponse>>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.identity_or_401()?;

    let lines = state
        .app
        .carts
        .list_lines(&owner)
        .await
        .map_err(into_api_error)?;

    Ok(Json(lines.into_iter().map(CartLineResponse::from).collect()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use shopfront_app::domain::carts::{MockCartsService, models::CartLineId};
    use testresult::TestResult;

    use crate::test_helpers::{TEST_EMAIL, carts_service, make_line};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart").get(handler))
    }

    #[tokio::test]
    async fn test_list_returns_owner_lines() -> TestResult {
        let line = make_line(CartLineId::new(), 3);
        let expected = CartLineResponse::from(line.clone());

        let mut carts = MockCartsService::new();

        carts
            .expect_list_lines()
            .once()
            .withf(|owner| owner.email() == TEST_EMAIL)
            .return_once(move |_| Ok(vec![line]));

        let mut res = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await;

        let body: Vec<CartLineResponse> = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body, vec![expected]);

        Ok(())
    }
}
