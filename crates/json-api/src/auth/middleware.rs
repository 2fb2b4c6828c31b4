//! Session cookie guard.

use std::sync::Arc;

use salvo::prelude::*;
use shopfront_app::auth::{ACCESS_COOKIE_NAME, RejectReason};
use tracing::warn;

use crate::{
    auth::into_api_error, errors::ApiError, extensions::*, observability::record_auth_rejection,
    state::State,
};

#[salvo::handler]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    let Some(token) = req.cookie(ACCESS_COOKIE_NAME).map(|cookie| cookie.value().to_owned())
    else {
        warn!(reason = %RejectReason::Missing, "rejected request without session cookie");
        record_auth_rejection(RejectReason::Missing.as_str());

        res.render(ApiError::unauthorized());
        ctrl.skip_rest();

        return;
    };

    let state = match depot.obtain_or_500::<Arc<State>>() {
        Ok(state) => state,
        Err(error) => {
            res.render(error);
            ctrl.skip_rest();

            return;
        }
    };

    let verified = state.app.auth.verify(&token);

    match verified {
        Ok(identity) => depot.insert_identity(identity),
        Err(error) => {
            res.render(into_api_error(error));
            ctrl.skip_rest();

            return;
        }
    }

    ctrl.call_next(req, depot, res).await;
}
