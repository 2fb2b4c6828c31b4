//! Cart HTTP models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use shopfront_app::domain::carts::models::CartLine;

/// Cart Line Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CartLineResponse {
    /// Cart line id (24 hex characters)
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub email: String,
    pub name: String,
    pub images: Vec<String>,
    pub price: f64,

    /// RFC 3339 creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            id: line.id.to_hex(),
            user_id: line.user_id,
            product_id: line.product_id,
            quantity: line.quantity,
            email: line.email,
            name: line.name,
            images: line.images,
            price: line.price,
            created_at: line.created_at.map(|at| at.to_string()),
        }
    }
}
