//! Auth data models.

use std::fmt;

use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Name of the cookie carrying the access token.
pub const ACCESS_COOKIE_NAME: &str = "token";

/// Name of the cookie carrying the refresh token.
pub const REFRESH_COOKIE_NAME: &str = "refresh_token";

/// The identity embedded in every token; the email is the sole ownership key for carts and
/// orders.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdentityClaim {
    email: String,
}

impl IdentityClaim {
    /// Build a claim from a raw email, trimming surrounding whitespace.
    ///
    /// Returns `None` when nothing is left after trimming.
    #[must_use]
    pub fn new(email: &str) -> Option<Self> {
        let email = email.trim();

        if email.is_empty() {
            return None;
        }

        Some(Self {
            email: email.to_string(),
        })
    }

    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Whether `email` refers to this identity.
    #[must_use]
    pub fn matches(&self, email: &str) -> bool {
        self.email == email.trim()
    }
}

impl fmt::Display for IdentityClaim {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.email)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Short-lived token used to authorize requests.
    Access,

    /// Long-lived token only good for minting new access tokens.
    Refresh,
}

impl TokenKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }

    #[must_use]
    pub const fn cookie_name(self) -> &'static str {
        match self {
            Self::Access => ACCESS_COOKIE_NAME,
            Self::Refresh => REFRESH_COOKIE_NAME,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// A freshly signed token.
#[derive(Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub kind: TokenKind,
    pub expires_at: Timestamp,
}

impl IssuedToken {
    /// Cookie directive carrying this token.
    ///
    /// `Max-Age` is the time the token has left as of `now`, so the browser drops the cookie at
    /// the moment the token stops verifying.
    #[must_use]
    pub fn session_cookie(&self, now: Timestamp) -> SessionCookie {
        let remaining = self.expires_at.duration_since(now);

        SessionCookie {
            name: self.kind.cookie_name(),
            value: self.token.clone(),
            http_only: true,
            secure: true,
            same_site: SameSitePolicy::None,
            path: "/",
            max_age: if remaining.is_negative() {
                SignedDuration::ZERO
            } else {
                remaining
            },
        }
    }
}

impl fmt::Debug for IssuedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuedToken")
            .field("token", &"**redacted**")
            .field("kind", &self.kind)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Access and refresh token issued together for one identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SameSitePolicy {
    Strict,
    Lax,
    None,
}

/// Framework-agnostic cookie directive; the HTTP layer turns it into a `Set-Cookie` header.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionCookie {
    pub name: &'static str,
    pub value: String,
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSitePolicy,
    pub path: &'static str,
    pub max_age: SignedDuration,
}

impl fmt::Debug for SessionCookie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCookie")
            .field("name", &self.name)
            .field("value", &"**redacted**")
            .field("http_only", &self.http_only)
            .field("secure", &self.secure)
            .field("same_site", &self.same_site)
            .field("path", &self.path)
            .field("max_age", &self.max_age)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_claim_trims_and_rejects_blank_emails() {
        let claim = IdentityClaim::new("  a@x.com ").expect("email should be accepted");

        assert_eq!(claim.email(), "a@x.com");
        assert!(claim.matches("a@x.com"));
        assert!(!claim.matches("b@x.com"));
        assert!(IdentityClaim::new("   ").is_none());
        assert!(IdentityClaim::new("").is_none());
    }

    #[test]
    fn session_cookie_lives_as_long_as_the_token() {
        let now = Timestamp::UNIX_EPOCH;
        let issued = IssuedToken {
            token: "abc".to_string(),
            kind: TokenKind::Access,
            expires_at: now + SignedDuration::from_mins(15),
        };

        let cookie = issued.session_cookie(now);

        assert_eq!(cookie.name, "token");
        assert_eq!(cookie.value, "abc");
        assert!(cookie.http_only);
        assert!(cookie.secure);
        assert_eq!(cookie.same_site, SameSitePolicy::None);
        assert_eq!(cookie.max_age, SignedDuration::from_mins(15));
    }

    #[test]
    fn session_cookie_for_expired_token_has_zero_max_age() {
        let now = Timestamp::UNIX_EPOCH + SignedDuration::from_hours(1);
        let issued = IssuedToken {
            token: "abc".to_string(),
            kind: TokenKind::Refresh,
            expires_at: Timestamp::UNIX_EPOCH,
        };

        let cookie = issued.session_cookie(now);

        assert_eq!(cookie.name, "refresh_token");
        assert_eq!(cookie.max_age, SignedDuration::ZERO);
    }
}
