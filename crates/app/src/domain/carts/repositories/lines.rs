//! Cart Lines Repository

use futures_util::TryStreamExt;
use mongodb::{
    Collection,
    bson::{DateTime, Document, doc, oid::ObjectId},
    error::Error,
    options::ReturnDocument,
};

use crate::{
    database::{CART_COLLECTION, Db},
    domain::carts::{errors::MAX_QUANTITY, models::NewCartLine, records::CartLineRecord},
};

/// How an upsert resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum UpsertedLine {
    Inserted(ObjectId),
    Matched,
}

#[derive(Debug, Clone)]
pub(crate) struct MongoCartLinesRepository {
    lines: Collection<CartLineRecord>,
}

impl MongoCartLinesRepository {
    #[must_use]
    pub(crate) fn new(db: &Db) -> Self {
        Self {
            lines: db.collection(CART_COLLECTION),
        }
    }

    pub(crate) async fn list_lines(&self, owner: &str) -> Result<Vec<CartLineRecord>, Error> {
        self.lines
            .find(doc! { "email": owner })
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .await?
            .try_collect()
            .await
    }

    pub(crate) async fn find_line(
        &self,
        owner: &str,
        line: ObjectId,
    ) -> Result<Option<CartLineRecord>, Error> {
        self.lines.find_one(owned(owner, line)).await
    }

    pub(crate) async fn find_line_for_product(
        &self,
        owner: &str,
        user_id: &str,
        product_id: &str,
    ) -> Result<Option<CartLineRecord>, Error> {
        self.lines
            .find_one(doc! { "userId": user_id, "productId": product_id, "email": owner })
            .await
    }

    /// Increment the owner's `(userId, productId)` line by `line.quantity`, inserting it when absent.
    ///
    /// A single server-side upsert. The unique `(email, userId, productId)` index rejects a second
    /// insert for the same key, which is also what a line too full to take `line.quantity` more
    /// units reports: the `$lte` filter misses and the upsert's insert collides with it.
    pub(crate) async fn upsert_line(
        &self,
        owner: &str,
        line: &NewCartLine,
        now: DateTime,
    ) -> Result<UpsertedLine, Error> {
        let result = self
            .lines
            .update_one(
                doc! {
                    "userId": line.user_id.as_str(),
                    "productId": line.product_id.as_str(),
                    "email": owner,
                    "quantity": { "$lte": MAX_QUANTITY - line.quantity },
                },
                doc! {
                    "$inc": { "quantity": line.quantity },
                    "$setOnInsert": {
                        "name": line.name.as_str(),
                        "images": line.images.clone(),
                        "price": line.price,
                        "createdAt": now,
                    },
                },
            )
            .upsert(true)
            .await?;

        Ok(match result.upserted_id.and_then(|id| id.as_object_id()) {
            Some(id) => UpsertedLine::Inserted(id),
            None => UpsertedLine::Matched,
        })
    }

    pub(crate) async fn set_quantity(
        &self,
        owner: &str,
        line: ObjectId,
        quantity: i64,
    ) -> Result<Option<CartLineRecord>, Error> {
        self.lines
            .find_one_and_update(owned(owner, line), doc! { "$set": { "quantity": quantity } })
            .return_document(ReturnDocument::After)
            .await
    }

    /// Increment only while the stored quantity is below the cap.
    pub(crate) async fn increment(
        &self,
        owner: &str,
        line: ObjectId,
    ) -> Result<Option<CartLineRecord>, Error> {
        let mut filter = owned(owner, line);
        filter.insert("quantity", doc! { "$lt": MAX_QUANTITY });

        self.lines
            .find_one_and_update(filter, doc! { "$inc": { "quantity": 1_i64 } })
            .return_document(ReturnDocument::After)
            .await
    }

    /// Decrement only while the stored quantity is above one, so the floor holds under races.
    pub(crate) async fn decrement(
        &self,
        owner: &str,
        line: ObjectId,
    ) -> Result<Option<CartLineRecord>, Error> {
        let mut filter = owned(owner, line);
        filter.insert("quantity", doc! { "$gt": 1_i64 });

        self.lines
            .find_one_and_update(filter, doc! { "$inc": { "quantity": -1_i64 } })
            .return_document(ReturnDocument::After)
            .await
    }

    pub(crate) async fn delete_line(&self, owner: &str, line: ObjectId) -> Result<u64, Error> {
        let result = self.lines.delete_one(owned(owner, line)).await?;

        Ok(result.deleted_count)
    }
}

fn owned(owner: &str, line: ObjectId) -> Document {
    doc! { "_id": line, "email": owner }
}
