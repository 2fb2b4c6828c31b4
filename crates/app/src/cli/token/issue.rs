use clap::{Args, ValueEnum};
use jiff::SignedDuration;
use shopfront_app::auth::{
    AuthService, IdentityClaim, JwtAuthService, JwtSettings, TokenKind, TokenSecret, parse_ttl,
};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Access,
    Refresh,
}

impl From<Kind> for TokenKind {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Access => Self::Access,
            Kind::Refresh => Self::Refresh,
        }
    }
}

#[derive(Debug, Args)]
pub(crate) struct IssueTokenArgs {
    /// Email to embed in the token
    #[arg(long)]
    email: String,

    /// Which kind of token to sign
    #[arg(long, value_enum, default_value = "access")]
    kind: Kind,

    /// Access token signing secret
    #[arg(long, env = "JWT_ACCESS", hide_env_values = true, default_value = "")]
    jwt_access: String,

    /// Refresh token signing secret
    #[arg(long, env = "JWT_REFRESH", hide_env_values = true, default_value = "")]
    jwt_refresh: String,

    /// Access token lifetime, e.g. `15m`, `1h` or `900` (seconds)
    #[arg(long, env = "JWT_EXPIRES_IN", default_value = "15m", value_parser = parse_expires_in)]
    jwt_expires_in: SignedDuration,
}

fn parse_expires_in(value: &str) -> Result<SignedDuration, String> {
    parse_ttl(value).map_err(|error| error.to_string())
}

pub(crate) fn run(args: IssueTokenArgs) -> Result<(), String> {
    let claim = IdentityClaim::new(&args.email).ok_or("email cannot be empty")?;

    let service = JwtAuthService::new(
        JwtSettings::new(
            TokenSecret::new(&args.jwt_access),
            TokenSecret::new(&args.jwt_refresh),
        )
        .with_access_ttl(args.jwt_expires_in),
    );

    let issued = service
        .issue(&claim, args.kind.into())
        .map_err(|error| format!("failed to issue token: {error}"))?;

    println!("email: {claim}");
    println!("kind: {}", issued.kind);
    println!("expires_at: {}", issued.expires_at);
    println!("token: {}", issued.token);

    Ok(())
}
