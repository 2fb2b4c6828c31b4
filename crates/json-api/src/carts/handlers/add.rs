//! Add To Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use shopfront_app::domain::carts::models::{AddItemOutcome, NewCartLine};
use tracing::info;

use crate::{
    carts::{errors::track_mutation, models::CartLineResponse},
    errors::ApiError,
    extensions::*,
    observability::record_cart_mutation,
    state::State,
};

/// Add To Cart Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AddToCartRequest {
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,

    /// Must match the signed-in user when present
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub price: f64,
}

impl From<AddToCartRequest> for NewCartLine {
    fn from(request: AddToCartRequest) -> Self {
        NewCartLine {
            user_id: request.user_id,
            product_id: request.product_id,
            quantity: request.quantity,
            name: request.name,
            images: request.images,
            price: request.price,
        }
    }
}

/// Add To Cart Response: the new line, or `{"updated": true}` when an existing line grew.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum AddToCartResponse {
    /// A line was created
    Created(CartLineResponse),

    /// An existing line's quantity was increased
    Updated {
        /// Always `true`
        updated: bool,
    },
}

/// Add To Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Add Item To Cart",
    request_body = AddToCartRequest,
    security(("session_cookie" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart line created"),
        (status_code = StatusCode::OK, description = "Existing cart line updated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::FORBIDDEN, description = "Email does not match session"),
        (status_code = StatusCode::CONFLICT, description = "Concurrent write to the same cart line"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<AddToCartResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let owner = depot.identity_or_401()?;
    let request = req
        .json_or_400::<AddToCartRequest>(INVALID_BODY_MESSAGE)
        .await?;

    if let Some(email) = request.email.as_deref()
        && !owner.matches(email)
    {
        record_cart_mutation("add", "forbidden");

        return Err(ApiError::forbidden());
    }

    let outcome = track_mutation(
        "add",
        state.app.carts.add_item(&owner, request.into()).await,
    )?;

    let response = match outcome {
        AddItemOutcome::Created(line) => {
            info!(cart_line = %line.id, quantity = line.quantity, "created cart line");

            res.status_code(StatusCode::CREATED);

            AddToCartResponse::Created(line.into())
        }
        AddItemOutcome::Updated(line) => {
            info!(cart_line = %line.id, quantity = line.quantity, "increased cart line");

            AddToCartResponse::Updated { updated: true }
        }
    };

    Ok(Json(response))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use shopfront_app::domain::carts::{CartsServiceError, MockCartsService, models::CartLineId};
    use testresult::TestResult;

    use crate::{
        errors::ErrorBody,
        extensions::INVALID_BODY_MESSAGE,
        test_helpers::{TEST_EMAIL, carts_service, make_line, strict_carts_mock},
    };

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        carts_service(carts, Router::with_path("cart/add").post(handler))
    }

    fn payload(quantity: i64) -> Value {
        json!({
            "userId": "u1",
            "productId": "p1",
            "quantity": quantity,
            "name": "Mug",
            "images": ["https://img.example.com/mug.png"],
            "price": 12.5,
        })
    }

    #[tokio::test]
    async fn test_add_new_line_returns_201_with_line() -> TestResult {
        let line = make_line(CartLineId::new(), 2);
        let expected = CartLineResponse::from(line.clone());

        let mut carts = MockCartsService::new();

        carts
            .expect_add_item()
            .once()
            .withf(|owner, new| {
                owner.email() == TEST_EMAIL
                    && new.user_id == "u1"
                    && new.product_id == "p1"
                    && new.quantity == 2
            })
            .return_once(move |_, _| Ok(AddItemOutcome::Created(line)));

        let mut res = TestClient::post("http://example.com/cart/add")
            .json(&payload(2))
            .send(&make_service(carts))
            .await;

        let body: CartLineResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(body, expected);

        Ok(())
    }

    #[tokio::test]
    async fn test_adding_same_product_twice_reports_update() -> TestResult {
        let stored = Arc::new(Mutex::new(None::<u32>));
        let id = CartLineId::new();

        let mut carts = MockCartsService::new();

        let counter = Arc::clone(&stored);

        carts
            .expect_add_item()
            .times(2)
            .returning(move |_, new| {
                let mut quantity = counter.lock().map_err(|_poisoned| CartsServiceError::NotFound)?;
                let previous = *quantity;
                let total = previous.unwrap_or(0) + u32::try_from(new.quantity)?;

                *quantity = Some(total);

                Ok(if previous.is_some() {
                    AddItemOutcome::Updated(make_line(id, total))
                } else {
                    AddItemOutcome::Created(make_line(id, total))
                })
            });

        let service = make_service(carts);

        let first = TestClient::post("http://example.com/cart/add")
            .json(&payload(2))
            .send(&service)
            .await;

        assert_eq!(first.status_code, Some(StatusCode::CREATED));

        let mut second = TestClient::post("http://example.com/cart/add")
            .json(&payload(2))
            .send(&service)
            .await;

        let body: Value = second.take_json().await?;

        assert_eq!(second.status_code, Some(StatusCode::OK));
        assert_eq!(body, json!({ "updated": true }));
        assert_eq!(*stored.lock().map_err(|_poisoned| "poisoned")?, Some(4));

        Ok(())
    }

    #[tokio::test]
    async fn test_add_with_other_email_returns_403() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().never();

        let mut body = payload(1);
        body["email"] = json!("someone-else@x.com");

        let mut res = TestClient::post("http://example.com/cart/add")
            .json(&body)
            .send(&make_service(carts))
            .await;

        let error: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));
        assert_eq!(error.code, "forbidden");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_zero_quantity_returns_400() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_add_item().once().return_once(|_, _| {
            Err(CartsServiceError::InvalidArgument(
                "Quantity must be a positive integer",
            ))
        });

        let mut res = TestClient::post("http://example.com/cart/add")
            .json(&payload(0))
            .send(&make_service(carts))
            .await;

        let error: ErrorBody = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert_eq!(error.code, "invalid_argument");

        Ok(())
    }

    #[tokio::test]
    async fn test_add_with_missing_or_mistyped_body_returns_json_400() -> TestResult {
        let mut mistyped = payload(1);
        mistyped["quantity"] = json!("two");

        let requests = [
            TestClient::post("http://example.com/cart/add"),
            TestClient::post("http://example.com/cart/add").json(&mistyped),
            TestClient::post("http://example.com/cart/add").json(&json!({ "quantity": 1 })),
        ];

        for request in requests {
            let mut res = request.send(&make_service(strict_carts_mock())).await;

            let error: ErrorBody = res.take_json().await?;

            assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
            assert_eq!(error.code, "invalid_argument");
            assert_eq!(error.message, INVALID_BODY_MESSAGE);
        }

        Ok(())
    }
}
