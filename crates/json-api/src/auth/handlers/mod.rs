//! Session Handlers

pub(crate) mod issue;
pub(crate) mod refresh;
