//! Authentication

mod cookies;
mod errors;
pub(crate) mod handlers;
pub(crate) mod middleware;

pub(crate) use cookies::*;
pub(crate) use errors::*;
