//! Issue Session Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use shopfront_app::auth::IdentityClaim;
use tracing::info;

use crate::{
    auth::{into_api_error, to_cookie},
    errors::ApiError,
    extensions::*,
    responses::SuccessResponse,
    state::State,
};

const EMAIL_REQUIRED: &str = "Email required";

/// Issue Session Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct IssueSessionRequest {
    /// Email to sign into the session
    #[serde(default)]
    pub email: Option<String>,
}

/// Issue Session Handler
///
/// Sets the `token` and `refresh_token` cookies.
#[endpoint(
    tags("auth"),
    summary = "Issue Session Tokens",
    request_body = IssueSessionRequest,
    responses(
        (status_code = StatusCode::OK, description = "Session cookies set"),
        (status_code = StatusCode::BAD_REQUEST, description = "Email required"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<SuccessResponse>, ApiError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let claim = req
        .json_or_400::<IssueSessionRequest>(EMAIL_REQUIRED)
        .await?
        .email
        .as_deref()
        .and_then(IdentityClaim::new)
        .ok_or_else(|| ApiError::invalid_argument(EMAIL_REQUIRED))?;

    let pair = state.app.auth.issue_pair(&claim).map_err(into_api_error)?;

    let now = Timestamp::now();

    res.add_cookie(to_cookie(pair.access.session_cookie(now)));
    res.add_cookie(to_cookie(pair.refresh.session_cookie(now)));

    info!(expires_at = %pair.access.expires_at, "issued session tokens");

    Ok(Json(SuccessResponse::ok()))
}
