//! Cart Repositories

mod lines;

pub(crate) use lines::{MongoCartLinesRepository, UpsertedLine};
