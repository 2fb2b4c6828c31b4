//! Cart Models

use jiff::Timestamp;

use crate::{domain::carts::records::CartLineRecord, ids::TypedId};

use super::CartsServiceError;

/// Cart Line ID
pub type CartLineId = TypedId<CartLine>;

/// Cart Line Model
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub id: CartLineId,
    pub user_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub email: String,
    pub name: String,
    pub images: Vec<String>,
    pub price: f64,
    pub created_at: Option<Timestamp>,
}

/// New Cart Line Model
///
/// `quantity` is signed so that zero and negative requests reach validation instead of failing
/// to deserialize.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    pub user_id: String,
    pub product_id: String,
    pub quantity: i64,
    pub name: String,
    pub images: Vec<String>,
    pub price: f64,
}

/// Result of adding a product to a cart.
#[derive(Debug, Clone, PartialEq)]
pub enum AddItemOutcome {
    /// No line existed for the `(user, product)` pair; this one was inserted.
    Created(CartLine),

    /// An existing line had its quantity increased.
    Updated(CartLine),
}

impl AddItemOutcome {
    #[must_use]
    pub fn line(&self) -> &CartLine {
        match self {
            Self::Created(line) | Self::Updated(line) => line,
        }
    }
}

impl TryFrom<CartLineRecord> for CartLine {
    type Error = CartsServiceError;

    fn try_from(record: CartLineRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CartLineId::from_object_id(record.id),
            user_id: record.user_id,
            product_id: record.product_id,
            quantity: u32::try_from(record.quantity)?,
            email: record.email,
            name: record.name,
            images: record.images,
            price: record.price,
            created_at: record
                .created_at
                .and_then(|at| Timestamp::from_millisecond(at.timestamp_millis()).ok()),
        })
    }
}
