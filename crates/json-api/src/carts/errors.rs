//! Errors

use shopfront_app::domain::carts::{CartsServiceError, models::CartLineId};
use tracing::error;

use crate::{errors::ApiError, observability::record_cart_mutation};

pub(crate) fn into_api_error(error: CartsServiceError) -> ApiError {
    match error {
        CartsServiceError::NotFound => ApiError::not_found("Item not found"),
        CartsServiceError::AlreadyExists => {
            ApiError::conflict("Cart line changed concurrently, retry the request")
        }
        CartsServiceError::InvalidArgument(message) => ApiError::invalid_argument(message),
        CartsServiceError::InvalidState(message) => ApiError::invalid_state(message),
        CartsServiceError::Store(source) => {
            error!("cart store operation failed: {source}");

            ApiError::server_error()
        }
        CartsServiceError::InvalidQuantity(source) => {
            error!("stored cart quantity is invalid: {source}");

            ApiError::server_error()
        }
    }
}

/// Count a cart mutation by outcome, then map any failure to its HTTP error.
pub(crate) fn track_mutation<T>(
    operation: &'static str,
    result: Result<T, CartsServiceError>,
) -> Result<T, ApiError> {
    match result {
        Ok(value) => {
            record_cart_mutation(operation, "ok");

            Ok(value)
        }
        Err(error) => {
            record_cart_mutation(operation, outcome(&error));

            Err(into_api_error(error))
        }
    }
}

pub(crate) fn parse_line_id(raw: &str) -> Result<CartLineId, ApiError> {
    raw.parse()
        .map_err(|_ignored| ApiError::invalid_argument("Invalid cart line id"))
}

fn outcome(error: &CartsServiceError) -> &'static str {
    match error {
        CartsServiceError::NotFound => "not_found",
        CartsServiceError::AlreadyExists => "conflict",
        CartsServiceError::InvalidArgument(_) => "invalid_argument",
        CartsServiceError::InvalidState(_) => "invalid_state",
        CartsServiceError::Store(_) | CartsServiceError::InvalidQuantity(_) => "error",
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn parse_line_id_rejects_non_object_ids() {
        assert!(parse_line_id("65f0c0ffee0000000000beef").is_ok());

        let error = parse_line_id("123").err();

        assert_eq!(
            error.map(|error| error.status()),
            Some(StatusCode::BAD_REQUEST)
        );
    }

    #[test]
    fn below_one_maps_to_invalid_state() {
        let error = into_api_error(CartsServiceError::InvalidState(
            "Quantity cannot be less than 1",
        ));

        assert_eq!(error.status(), StatusCode::BAD_REQUEST);
        assert_eq!(error.code(), "invalid_state");
    }
}
