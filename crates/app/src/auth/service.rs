//! Auth service.

use jiff::Timestamp;
use mockall::automock;
use tracing::debug;

use crate::auth::{
    AuthServiceError, IdentityClaim, IssuedToken, JwtSettings, TokenError, TokenKind, TokenPair,
    token,
};

/// Stateless JWT authenticator backed by HS256 secrets.
#[derive(Debug, Clone)]
pub struct JwtAuthService {
    settings: JwtSettings,
}

impl JwtAuthService {
    #[must_use]
    pub fn new(settings: JwtSettings) -> Self {
        Self { settings }
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthServiceError::Config`] when no secret is configured for `kind`.
    pub fn issue_at(
        &self,
        claim: &IdentityClaim,
        kind: TokenKind,
        now: Timestamp,
    ) -> Result<IssuedToken, AuthServiceError> {
        let secret = self
            .settings
            .secret(kind)
            .ok_or(TokenError::MissingSecret(kind))?;

        let issued = token::sign(claim, kind, secret, self.settings.ttl(kind), now)?;

        debug!(kind = %kind, expires_at = %issued.expires_at, "issued token");

        Ok(issued)
    }

    fn verify_kind(
        &self,
        bearer: &str,
        kind: TokenKind,
    ) -> Result<IdentityClaim, AuthServiceError> {
        let secret = self
            .settings
            .secret(kind)
            .ok_or(TokenError::MissingSecret(kind))?;

        Ok(token::verify(bearer, secret)?)
    }
}

impl AuthService for JwtAuthService {
    fn issue(
        &self,
        claim: &IdentityClaim,
        kind: TokenKind,
    ) -> Result<IssuedToken, AuthServiceError> {
        self.issue_at(claim, kind, Timestamp::now())
    }

    fn issue_pair(&self, claim: &IdentityClaim) -> Result<TokenPair, AuthServiceError> {
        let now = Timestamp::now();

        Ok(TokenPair {
            access: self.issue_at(claim, TokenKind::Access, now)?,
            refresh: self.issue_at(claim, TokenKind::Refresh, now)?,
        })
    }

    fn verify(&self, token: &str) -> Result<IdentityClaim, AuthServiceError> {
        self.verify_kind(token, TokenKind::Access)
    }

    fn redeem(&self, refresh_token: &str) -> Result<IssuedToken, AuthServiceError> {
        let claim = self.verify_kind(refresh_token, TokenKind::Refresh)?;

        self.issue(&claim, TokenKind::Access)
    }
}

#[automock]
pub trait AuthService: Send + Sync {
    /// Sign a token of the given kind for `claim`.
    fn issue(&self, claim: &IdentityClaim, kind: TokenKind)
    -> Result<IssuedToken, AuthServiceError>;

    /// Sign an access token and a refresh token for `claim`.
    fn issue_pair(&self, claim: &IdentityClaim) -> Result<TokenPair, AuthServiceError>;

    /// Verify an access token and return its identity.
    fn verify(&self, token: &str) -> Result<IdentityClaim, AuthServiceError>;

    /// Exchange a valid refresh token for a new access token.
    fn redeem(&self, refresh_token: &str) -> Result<IssuedToken, AuthServiceError>;
}
