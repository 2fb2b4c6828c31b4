//! Extension traits

mod depot;
mod request;

pub(crate) use depot::DepotExt as _;
pub(crate) use request::{INVALID_BODY_MESSAGE, RequestExt as _};
