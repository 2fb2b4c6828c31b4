//! Cart Handlers

pub(crate) mod add;
pub(crate) mod decrease;
pub(crate) mod delete;
pub(crate) mod increase;
pub(crate) mod list;
pub(crate) mod update;
