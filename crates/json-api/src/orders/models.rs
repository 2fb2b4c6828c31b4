//! Order HTTP models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use shopfront_app::domain::orders::models::{
    CustomerDetails, NewOrder, NewOrderLine, Order, OrderLine,
};

/// Customer block of an order request.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerRequest {
    /// Must match the signed-in user when present
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderLineRequest {
    pub product_id: String,
    pub quantity: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub price: f64,
    #[serde(default)]
    pub images: Vec<String>,
}

/// Create Order Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    #[serde(default)]
    pub customer: CustomerRequest,
    pub items: Vec<OrderLineRequest>,

    /// Order total; computed from the items when omitted
    #[serde(default)]
    pub total: Option<f64>,
}

impl From<CreateOrderRequest> for NewOrder {
    fn from(request: CreateOrderRequest) -> Self {
        NewOrder {
            customer: CustomerDetails {
                name: request.customer.name,
                phone: request.customer.phone,
                address: request.customer.address,
            },
            items: request
                .items
                .into_iter()
                .map(|line| NewOrderLine {
                    product_id: line.product_id,
                    name: line.name,
                    quantity: line.quantity,
                    price: line.price,
                    images: line.images,
                })
                .collect(),
            total: request.total,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) struct CustomerResponse {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderLineResponse {
    pub product_id: String,
    pub name: String,
    pub quantity: u32,
    pub price: f64,
    pub images: Vec<String>,
}

impl From<OrderLine> for OrderLineResponse {
    fn from(line: OrderLine) -> Self {
        Self {
            product_id: line.product_id,
            name: line.name,
            quantity: line.quantity,
            price: line.price,
            images: line.images,
        }
    }
}

/// Order Response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrderResponse {
    /// Order id (24 hex characters)
    #[serde(rename = "_id")]
    pub id: String,
    pub customer: CustomerResponse,
    pub items: Vec<OrderLineResponse>,
    pub total: f64,

    /// RFC 3339 creation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.to_hex(),
            customer: CustomerResponse {
                email: order.customer.email,
                name: order.customer.details.name,
                phone: order.customer.details.phone,
                address: order.customer.details.address,
            },
            items: order.items.into_iter().map(OrderLineResponse::from).collect(),
            total: order.total,
            created_at: order.created_at.map(|at| at.to_string()),
        }
    }
}
