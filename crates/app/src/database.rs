//! Database connection management

use mongodb::{
    Client, Collection, Database, IndexModel,
    bson::{Document, doc},
    error::Error,
    options::IndexOptions,
};
use tracing::{debug, info};

/// Collection holding one document per cart line.
pub const CART_COLLECTION: &str = "cart";

/// Collection holding placed orders.
pub const ORDERS_COLLECTION: &str = "orders";

/// Explicitly constructed store handle.
///
/// Cloning is cheap; every clone shares the driver's connection pool. The pool is only released
/// by [`Db::close`].
#[derive(Debug, Clone)]
pub struct Db {
    client: Client,
    database: Database,
}

impl Db {
    #[must_use]
    pub fn new(client: Client, database_name: &str) -> Self {
        let database = client.database(database_name);

        Self { client, database }
    }

    /// Typed handle to a collection in this database.
    #[must_use]
    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.database.collection::<T>(name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.database.name()
    }

    /// Round-trip a `ping` so connection problems surface at startup rather than on first use.
    ///
    /// # Errors
    ///
    /// Returns an error when the server cannot be reached.
    pub async fn ping(&self) -> Result<(), Error> {
        self.database.run_command(doc! { "ping": 1 }).await?;

        Ok(())
    }

    /// Create the indexes the services rely on.
    ///
    /// The unique `(email, userId, productId)` index is what keeps concurrent cart upserts from
    /// producing two lines for the same pair. It is scoped by owner, so a `userId` sent by one
    /// account never blocks another account's line.
    ///
    /// # Errors
    ///
    /// Returns an error when index creation fails, e.g. because duplicate cart lines already exist.
    pub async fn ensure_indexes(&self) -> Result<(), Error> {
        let cart = self.collection::<Document>(CART_COLLECTION);

        cart.create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1, "userId": 1, "productId": 1 })
                .options(
                    IndexOptions::builder()
                        .name("cart_owner_user_product_unique".to_string())
                        .unique(true)
                        .build(),
                )
                .build(),
        )
        .await?;

        cart.create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1, "createdAt": -1 })
                .build(),
        )
        .await?;

        self.collection::<Document>(ORDERS_COLLECTION)
            .create_index(
                IndexModel::builder()
                    .keys(doc! { "customer.email": 1, "_id": -1 })
                    .build(),
            )
            .await?;

        debug!(database = self.name(), "ensured collection indexes");

        Ok(())
    }

    /// Drop the whole database. Only used by test teardown.
    ///
    /// # Errors
    ///
    /// Returns an error when the drop command fails.
    pub async fn drop_database(&self) -> Result<(), Error> {
        self.database.drop().await
    }

    /// Close the underlying client and wait for in-flight operations to finish.
    pub async fn close(self) {
        info!(database = self.name(), "closing database client");

        self.client.shutdown().await;
    }
}

/// Connect to `MongoDB` without touching the server.
///
/// # Errors
///
/// Returns an error if the connection string cannot be parsed.
pub async fn connect(uri: &str, database_name: &str) -> Result<Db, Error> {
    let client = Client::with_uri_str(uri).await?;

    Ok(Db::new(client, database_name))
}

/// Connect, verify the server is reachable, and ensure indexes.
///
/// # Errors
///
/// Returns an error if any of the three steps fails.
pub async fn init(uri: &str, database_name: &str) -> Result<Db, Error> {
    let db = connect(uri, database_name).await?;

    db.ping().await?;
    db.ensure_indexes().await?;

    info!(database = database_name, "database ready");

    Ok(db)
}
