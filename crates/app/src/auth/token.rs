//! JWT signing and verification.

use std::fmt;

use jiff::{SignedDuration, Span, SpanRelativeTo, Timestamp};
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;
use zeroize::Zeroize;

use crate::auth::{
    RejectReason,
    models::{Claims, IdentityClaim, IssuedToken, TokenKind},
};

/// Default lifetime of access tokens.
pub const ACCESS_TOKEN_TTL: SignedDuration = SignedDuration::from_mins(15);

/// Lifetime of refresh tokens.
pub const REFRESH_TOKEN_TTL: SignedDuration = SignedDuration::from_hours(7 * 24);

const ALGORITHM: Algorithm = Algorithm::HS256;

/// HMAC signing secret. Zeroed on drop and never printed.
#[derive(Clone)]
pub struct TokenSecret {
    bytes: Vec<u8>,
}

impl TokenSecret {
    /// Wrap a raw secret; blank secrets count as not configured.
    #[must_use]
    pub fn new(secret: &str) -> Option<Self> {
        if secret.trim().is_empty() {
            return None;
        }

        Some(Self {
            bytes: secret.as_bytes().to_vec(),
        })
    }

    fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TokenSecret(**redacted**)")
    }
}

impl Drop for TokenSecret {
    fn drop(&mut self) {
        self.bytes.zeroize();
    }
}

/// Secrets and lifetimes for both token kinds.
#[derive(Debug, Clone)]
pub struct JwtSettings {
    pub access_secret: Option<TokenSecret>,
    pub refresh_secret: Option<TokenSecret>,
    pub access_ttl: SignedDuration,
    pub refresh_ttl: SignedDuration,
}

impl JwtSettings {
    /// Settings with the default lifetimes.
    #[must_use]
    pub fn new(access_secret: Option<TokenSecret>, refresh_secret: Option<TokenSecret>) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl: ACCESS_TOKEN_TTL,
            refresh_ttl: REFRESH_TOKEN_TTL,
        }
    }

    #[must_use]
    pub fn with_access_ttl(mut self, ttl: SignedDuration) -> Self {
        self.access_ttl = ttl;
        self
    }

    #[must_use]
    pub fn secret(&self, kind: TokenKind) -> Option<&TokenSecret> {
        match kind {
            TokenKind::Access => self.access_secret.as_ref(),
            TokenKind::Refresh => self.refresh_secret.as_ref(),
        }
    }

    #[must_use]
    pub fn ttl(&self, kind: TokenKind) -> SignedDuration {
        match kind {
            TokenKind::Access => self.access_ttl,
            TokenKind::Refresh => self.refresh_ttl,
        }
    }
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("no signing secret configured for {0} tokens")]
    MissingSecret(TokenKind),

    #[error("identity claim has an empty email")]
    EmptyClaim,

    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("token rejected: {0}")]
    Rejected(RejectReason),
}

#[derive(Debug, Error)]
pub enum TtlParseError {
    #[error("invalid duration: {0}")]
    Invalid(#[source] jiff::Error),

    #[error("token lifetime must be positive")]
    NotPositive,

    #[error("token lifetime cannot exceed ten years")]
    TooLong,
}

/// Longest accepted token lifetime; keeps `now + ttl` well inside the timestamp range.
const MAX_TTL: SignedDuration = SignedDuration::from_hours(24 * 3_653);

/// Parse a token lifetime such as `15m`, `1h`, `1d` or `PT15M`. Days are 24 hours long, and a
/// bare integer such as `900` is a number of seconds.
///
/// # Errors
///
/// Returns an error for unparseable or non-positive durations.
pub fn parse_ttl(value: &str) -> Result<SignedDuration, TtlParseError> {
    let value = value.trim();

    let ttl = match value.parse::<i64>() {
        Ok(seconds) => SignedDuration::from_secs(seconds),
        Err(_) => value
            .parse::<Span>()
            .map_err(TtlParseError::Invalid)?
            .to_duration(SpanRelativeTo::days_are_24_hours())
            .map_err(TtlParseError::Invalid)?,
    };

    if ttl.is_zero() || ttl.is_negative() {
        return Err(TtlParseError::NotPositive);
    }

    if ttl > MAX_TTL {
        return Err(TtlParseError::TooLong);
    }

    Ok(ttl)
}

/// Sign a token for `claim` that expires `ttl` after `now`.
pub(crate) fn sign(
    claim: &IdentityClaim,
    kind: TokenKind,
    secret: &TokenSecret,
    ttl: SignedDuration,
    now: Timestamp,
) -> Result<IssuedToken, TokenError> {
    if claim.email().is_empty() {
        return Err(TokenError::EmptyClaim);
    }

    let expires_at = now + ttl;

    let claims = Claims {
        email: claim.email().to_string(),
        iat: now.as_second(),
        exp: expires_at.as_second(),
    };

    let token = encode(
        &Header::new(ALGORITHM),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(TokenError::Signing)?;

    Ok(IssuedToken {
        token,
        kind,
        expires_at,
    })
}

/// Check signature and expiry, returning the embedded identity.
pub(crate) fn verify(token: &str, secret: &TokenSecret) -> Result<IdentityClaim, TokenError> {
    if token.trim().is_empty() {
        return Err(TokenError::Rejected(RejectReason::Missing));
    }

    let mut validation = Validation::new(ALGORITHM);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|error| TokenError::Rejected(reject_reason(error.kind())))?;

    IdentityClaim::new(&data.claims.email).ok_or(TokenError::Rejected(RejectReason::EmptyClaim))
}

fn reject_reason(kind: &ErrorKind) -> RejectReason {
    match kind {
        ErrorKind::ExpiredSignature => RejectReason::Expired,
        ErrorKind::InvalidSignature => RejectReason::BadSignature,
        _ => RejectReason::Malformed,
    }
}
