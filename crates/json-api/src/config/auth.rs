//! Auth Config

use clap::Args;
use jiff::SignedDuration;
use shopfront_app::auth::{JwtSettings, TokenSecret, parse_ttl};

/// JWT session settings.
#[derive(Debug, Args)]
pub struct AuthConfig {
    /// Access token signing secret
    #[arg(long, env = "JWT_ACCESS", hide_env_values = true, default_value = "")]
    pub jwt_access: String,

    /// Refresh token signing secret
    #[arg(long, env = "JWT_REFRESH", hide_env_values = true, default_value = "")]
    pub jwt_refresh: String,

    /// Access token lifetime, e.g. `15m`, `1h`, `1d` or `900` (seconds)
    #[arg(long, env = "JWT_EXPIRES_IN", default_value = "15m", value_parser = parse_ttl)]
    pub jwt_expires_in: SignedDuration,
}

impl AuthConfig {
    /// Signing settings for the auth service. Blank secrets stay unset.
    #[must_use]
    pub fn jwt_settings(&self) -> JwtSettings {
        JwtSettings::new(
            TokenSecret::new(&self.jwt_access),
            TokenSecret::new(&self.jwt_refresh),
        )
        .with_access_ttl(self.jwt_expires_in)
    }

    /// Names of the token kinds that have no secret configured.
    #[must_use]
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        [("JWT_ACCESS", &self.jwt_access), ("JWT_REFRESH", &self.jwt_refresh)]
            .into_iter()
            .filter(|(_, secret)| secret.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}
