//! Carts service errors.

use std::num::TryFromIntError;

use mongodb::error::{Error, ErrorKind, WriteFailure};
use thiserror::Error;

/// Message reported when a decrement would take a line below one unit.
pub const QUANTITY_BELOW_ONE: &str = "Quantity cannot be less than 1";

/// Message reported for non-positive quantities.
pub const QUANTITY_NOT_POSITIVE: &str = "Quantity must be a positive integer";

/// Largest quantity a single line may hold.
pub const MAX_QUANTITY: i64 = u32::MAX as i64;

/// Message reported when a write would take a line above [`MAX_QUANTITY`].
pub const QUANTITY_TOO_LARGE: &str = "Quantity cannot be greater than 4294967295";

const DUPLICATE_KEY: i32 = 11_000;

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("cart line not found")]
    NotFound,

    #[error("cart line is being written concurrently")]
    AlreadyExists,

    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),

    #[error("invalid state: {0}")]
    InvalidState(&'static str),

    #[error("storage error")]
    Store(#[source] Error),

    #[error("invalid stored quantity")]
    InvalidQuantity(#[from] TryFromIntError),
}

impl From<Error> for CartsServiceError {
    fn from(error: Error) -> Self {
        if is_duplicate_key(&error) {
            return Self::AlreadyExists;
        }

        Self::Store(error)
    }
}

pub(crate) fn is_duplicate_key(error: &Error) -> bool {
    match error.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => write_error.code == DUPLICATE_KEY,
        ErrorKind::Command(command_error) => command_error.code == DUPLICATE_KEY,
        _ => false,
    }
}

