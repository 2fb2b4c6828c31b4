//! Session cookies.

use salvo::http::cookie::{Cookie, SameSite, time::Duration};
use shopfront_app::auth::{SameSitePolicy, SessionCookie};

/// Turn a session cookie directive into a `Set-Cookie` value.
pub(crate) fn to_cookie(session: SessionCookie) -> Cookie<'static> {
    Cookie::build((session.name, session.value))
        .http_only(session.http_only)
        .secure(session.secure)
        .same_site(match session.same_site {
            SameSitePolicy::Strict => SameSite::Strict,
            SameSitePolicy::Lax => SameSite::Lax,
            SameSitePolicy::None => SameSite::None,
        })
        .path(session.path)
        .max_age(Duration::seconds(session.max_age.as_secs()))
        .build()
}
