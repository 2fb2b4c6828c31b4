//! Auth service errors.

use std::fmt;

use thiserror::Error;

use crate::auth::{TokenError, TokenKind};

/// Why a presented token was not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Missing,
    Malformed,
    BadSignature,
    Expired,
    EmptyClaim,
}

impl RejectReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Malformed => "malformed",
            Self::BadSignature => "bad_signature",
            Self::Expired => "expired",
            Self::EmptyClaim => "empty_claim",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("unauthorized ({0})")]
    Unauthorized(RejectReason),

    #[error("signing secret for {0} tokens is not configured")]
    Config(TokenKind),

    #[error("identity claim is invalid")]
    InvalidArgument,

    #[error("token signing error")]
    Token(#[source] jsonwebtoken::errors::Error),
}

impl From<TokenError> for AuthServiceError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::MissingSecret(kind) => Self::Config(kind),
            TokenError::EmptyClaim => Self::InvalidArgument,
            TokenError::Signing(source) => Self::Token(source),
            TokenError::Rejected(reason) => Self::Unauthorized(reason),
        }
    }
}
