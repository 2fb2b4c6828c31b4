//! Orders service errors.

use std::num::TryFromIntError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("storage error")]
    Store(#[from] mongodb::error::Error),

    #[error("invalid stored quantity")]
    InvalidQuantity(#[from] TryFromIntError),
}
