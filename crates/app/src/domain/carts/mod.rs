//! Carts

pub mod errors;
pub mod models;
mod records;
mod repositories;
pub mod service;

pub use errors::CartsServiceError;
pub use service::*;
