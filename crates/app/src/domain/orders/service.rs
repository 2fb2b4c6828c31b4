//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use mongodb::bson::{DateTime, oid::ObjectId};
use tracing::info;

use crate::{
    auth::IdentityClaim,
    database::Db,
    domain::{
        carts::errors::{MAX_QUANTITY, QUANTITY_TOO_LARGE},
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, Order},
            records::{CustomerRecord, OrderLineRecord, OrderRecord},
            repositories::MongoOrdersRepository,
        },
    },
};

#[derive(Debug, Clone)]
pub struct MongoOrdersService {
    repository: MongoOrdersRepository,
}

impl MongoOrdersService {
    #[must_use]
    pub fn new(db: &Db) -> Self {
        Self {
            repository: MongoOrdersRepository::new(db),
        }
    }
}

#[async_trait]
impl OrdersService for MongoOrdersService {
    async fn place_order(
        &self,
        owner: &IdentityClaim,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError> {
        if order.items.is_empty() {
            return Err(OrdersServiceError::InvalidArgument(
                "An order needs at least one item",
            ));
        }

        if order.items.iter().any(|line| line.quantity < 1) {
            return Err(OrdersServiceError::InvalidArgument(
                "Quantity cannot be less than 1",
            ));
        }

        if order.items.iter().any(|line| line.quantity > MAX_QUANTITY) {
            return Err(OrdersServiceError::InvalidArgument(QUANTITY_TOO_LARGE));
        }

        let total = order.total.unwrap_or_else(|| order.line_total());

        let record = OrderRecord {
            id: ObjectId::new(),
            customer: CustomerRecord {
                email: owner.email().to_string(),
                name: order.customer.name,
                phone: order.customer.phone,
                address: order.customer.address,
            },
            items: order
                .items
                .into_iter()
                .map(|line| OrderLineRecord {
                    product_id: line.product_id,
                    name: line.name,
                    quantity: line.quantity,
                    price: line.price,
                    images: line.images,
                })
                .collect(),
            total: Some(total),
            created_at: Some(DateTime::now()),
        };

        self.repository.insert_order(&record).await?;

        info!(order_id = %record.id, lines = record.items.len(), total, "placed order");

        record.try_into()
    }

    async fn orders_for(&self, owner: &IdentityClaim) -> Result<Vec<Order>, OrdersServiceError> {
        self.repository
            .orders_for(owner.email())
            .await?
            .into_iter()
            .map(Order::try_from)
            .collect()
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Record a new order for `owner`.
    async fn place_order(
        &self,
        owner: &IdentityClaim,
        order: NewOrder,
    ) -> Result<Order, OrdersServiceError>;

    /// Orders placed by `owner`, newest first.
    async fn orders_for(&self, owner: &IdentityClaim) -> Result<Vec<Order>, OrdersServiceError>;
}
