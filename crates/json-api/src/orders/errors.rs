//! Errors

use shopfront_app::domain::orders::OrdersServiceError;
use tracing::error;

use crate::errors::ApiError;

pub(crate) fn into_api_error(error: OrdersServiceError) -> ApiError {
    match error {
        OrdersServiceError::InvalidArgument(message) => ApiError::invalid_argument(message),
        OrdersServiceError::Store(source) => {
            error!("order store operation failed: {source}");

            ApiError::server_error()
        }
        OrdersServiceError::InvalidQuantity(source) => {
            error!("stored order quantity is invalid: {source}");

            ApiError::server_error()
        }
    }
}
