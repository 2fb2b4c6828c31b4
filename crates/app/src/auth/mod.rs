//! Session authentication

mod errors;
mod models;
mod service;
mod token;

pub use errors::*;
pub use models::*;
pub use service::*;
pub use token::{
    ACCESS_TOKEN_TTL, JwtSettings, REFRESH_TOKEN_TTL, TokenError, TokenSecret, TtlParseError,
    parse_ttl,
};
