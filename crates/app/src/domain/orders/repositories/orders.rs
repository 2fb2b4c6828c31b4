//! Orders Repository

use futures_util::TryStreamExt;
use mongodb::{Collection, bson::doc, error::Error};

use crate::{
    database::{Db, ORDERS_COLLECTION},
    domain::orders::records::OrderRecord,
};

#[derive(Debug, Clone)]
pub(crate) struct MongoOrdersRepository {
    orders: Collection<OrderRecord>,
}

impl MongoOrdersRepository {
    #[must_use]
    pub(crate) fn new(db: &Db) -> Self {
        Self {
            orders: db.collection(ORDERS_COLLECTION),
        }
    }

    pub(crate) async fn insert_order(&self, order: &OrderRecord) -> Result<(), Error> {
        self.orders.insert_one(order).await?;

        Ok(())
    }

    pub(crate) async fn orders_for(&self, email: &str) -> Result<Vec<OrderRecord>, Error> {
        self.orders
            .find(doc! { "customer.email": email })
            .sort(doc! { "_id": -1 })
            .await?
            .try_collect()
            .await
    }
}
