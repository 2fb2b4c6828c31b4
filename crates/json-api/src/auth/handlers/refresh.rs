//! Refresh Session Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::prelude::*;
use shopfront_app::auth::{REFRESH_COOKIE_NAME, RejectReason};
use tracing::{info, warn};

use crate::{
    auth::{into_api_error, to_cookie},
    errors::ApiError,
    extensions::*,
    observability::record_auth_rejection,
    responses::SuccessResponse,
    state::State,
};

/// Refresh Session Handler
///
/// Exchanges the `refresh_token` cookie for a new `token` cookie.
#[endpoint(
    tags("auth"),
    summary = "Refresh Access Token",
    responses(
        (status_code = StatusCode::OK, description = "Access cookie renewed"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SuccessResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let Some(refresh_token) = req.cookie(REFRESH_COOKIE_NAME).map(|cookie| cookie.value()) else {
        warn!(reason = %RejectReason::Missing, "refresh attempted without refresh cookie");
        record_auth_rejection(RejectReason::Missing.as_str());

        return Err(ApiError::unauthorized());
    };

    let access = state
        .app
        .auth
        .redeem(refresh_token)
        .map_err(into_api_error)?;

    res.add_cookie(to_cookie(access.session_cookie(Timestamp::now())));

    info!(expires_at = %access.expires_at, "refreshed access token");

    Ok(Json(SuccessResponse::ok()))
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use salvo::test::{ResponseExt, TestClient};
    use shopfront_app::auth::{AuthServiceError, IssuedToken, MockAuthService, TokenKind};
    use testresult::TestResult;

    use crate::test_helpers::{auth_service, strict_auth_mock};

    use super::*;

    fn make_service(auth: MockAuthService) -> Service {
        auth_service(auth, Router::with_path("jwt/refresh").post(handler))
    }

    #[tokio::test]
    async fn test_refresh_sets_new_access_cookie() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_redeem()
            .once()
            .withf(|token| token == "refresh-jwt")
            .return_once(|_| {
                Ok(IssuedToken {
                    token: "fresh-access".to_string(),
                    kind: TokenKind::Access,
                    expires_at: Timestamp::now() + SignedDuration::from_mins(15),
                })
            });

        let mut res = TestClient::post("http://example.com/jwt/refresh")
            .add_header("cookie", "refresh_token=refresh-jwt", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let access = res.cookie("token").ok_or("token cookie should be set")?;

        assert_eq!(access.value(), "fresh-access");

        let body: SuccessResponse = res.take_json().await?;

        assert!(body.success);

        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_without_cookie_returns_401() -> TestResult {
        let res = TestClient::post("http://example.com/jwt/refresh")
            .send(&make_service(strict_auth_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_refresh_with_access_token_returns_401() -> TestResult {
        let mut auth = MockAuthService::new();

        auth.expect_redeem()
            .once()
            .return_once(|_| Err(AuthServiceError::Unauthorized(RejectReason::BadSignature)));

        let res = TestClient::post("http://example.com/jwt/refresh")
            .add_header("cookie", "refresh_token=access-jwt", true)
            .send(&make_service(auth))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED));

        Ok(())
    }
}
