//! Errors

use shopfront_app::auth::AuthServiceError;
use tracing::{error, warn};

use crate::{errors::ApiError, observability::record_auth_rejection};

pub(crate) fn into_api_error(error: AuthServiceError) -> ApiError {
    match error {
        AuthServiceError::Unauthorized(reason) => {
            warn!(%reason, "rejected session token");
            record_auth_rejection(reason.as_str());

            ApiError::unauthorized()
        }
        AuthServiceError::InvalidArgument => ApiError::invalid_argument("Email required"),
        AuthServiceError::Config(kind) => {
            error!("no signing secret configured for {kind} tokens");

            ApiError::server_error()
        }
        AuthServiceError::Token(source) => {
            error!("failed to sign token: {source}");

            ApiError::server_error()
        }
    }
}
