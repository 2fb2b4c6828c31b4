//! Order Models

use jiff::Timestamp;

use crate::{
    domain::orders::{
        OrdersServiceError,
        records::{CustomerRecord, OrderLineRecord, OrderRecord},
    },
    ids::TypedId,
};

/// Order ID
pub type OrderId = TypedId<Order>;

/// Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: OrderId,
    pub customer: Customer,
    pub items: Vec<OrderLine>,
    pub total: f64,
    pub created_at: Option<Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    pub email: String,
    pub details: CustomerDetails,
}

/// Contact details supplied with an order. The email always comes from the session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub images: Vec<String>,
}

/// New Order Model
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub customer: CustomerDetails,
    pub items: Vec<NewOrderLine>,

    /// Client-computed total; the line sum is stored when absent.
    pub total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderLine {
    pub product_id: String,
    pub name: String,
    pub quantity: i64,
    pub price: f64,
    pub images: Vec<String>,
}

impl NewOrder {
    /// Sum of `price * quantity` over every line.
    #[must_use]
    pub fn line_total(&self) -> f64 {
        self.items
            .iter()
            .map(|line| line.price * line.quantity as f64)
            .sum()
    }
}

impl TryFrom<OrderRecord> for Order {
    type Error = OrdersServiceError;

    fn try_from(record: OrderRecord) -> Result<Self, Self::Error> {
        let items = record
            .items
            .into_iter()
            .map(OrderLine::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let total = record.total.unwrap_or_else(|| {
            items
                .iter()
                .map(|line| line.price * f64::from(line.quantity))
                .sum()
        });

        Ok(Self {
            id: OrderId::from_object_id(record.id),
            customer: record.customer.into(),
            items,
            total,
            created_at: record
                .created_at
                .and_then(|at| Timestamp::from_millisecond(at.timestamp_millis()).ok()),
        })
    }
}

impl From<CustomerRecord> for Customer {
    fn from(record: CustomerRecord) -> Self {
        Self {
            email: record.email,
            details: CustomerDetails {
                name: record.name,
                phone: record.phone,
                address: record.address,
            },
        }
    }
}

impl TryFrom<OrderLineRecord> for OrderLine {
    type Error = OrdersServiceError;

    fn try_from(record: OrderLineRecord) -> Result<Self, Self::Error> {
        Ok(Self {
            product_id: record.product_id,
            name: record.name,
            quantity: u32::try_from(record.quantity)?,
            price: record.price,
            images: record.images,
        })
    }
}
