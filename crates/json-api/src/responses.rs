//! Shared response bodies

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};

/// `{"success": true}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct SuccessResponse {
    /// Always `true`.
    pub success: bool,
}

impl SuccessResponse {
    pub(crate) const fn ok() -> Self {
        Self { success: true }
    }
}
