//! Depot helper extensions.

use std::any::Any;

use salvo::prelude::Depot;
use shopfront_app::auth::IdentityClaim;

use crate::errors::ApiError;

const IDENTITY_DEPOT_KEY: &str = "identity";

/// Typed access to request-scoped values stored in the depot.
pub(crate) trait DepotExt {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError>;

    fn insert_identity(&mut self, identity: IdentityClaim);

    /// The identity the auth guard verified for this request.
    fn identity_or_401(&self) -> Result<IdentityClaim, ApiError>;
}

impl DepotExt for Depot {
    fn obtain_or_500<T: Any + Send + Sync>(&self) -> Result<&T, ApiError> {
        self.obtain::<T>()
            .map_err(|_ignored| ApiError::server_error())
    }

    fn insert_identity(&mut self, identity: IdentityClaim) {
        self.insert(IDENTITY_DEPOT_KEY, identity);
    }

    fn identity_or_401(&self) -> Result<IdentityClaim, ApiError> {
        self.get::<IdentityClaim>(IDENTITY_DEPOT_KEY)
            .cloned()
            .map_err(|_ignored| ApiError::unauthorized())
    }
}
