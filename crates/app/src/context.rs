//! App Context

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::{
    auth::{AuthService, JwtAuthService, JwtSettings},
    database::{self, Db},
    domain::{
        carts::{CartsService, MongoCartsService},
        orders::{MongoOrdersService, OrdersService},
    },
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to initialise database")]
    Database(#[source] mongodb::error::Error),
}

/// Wired services plus the store handle they share.
#[derive(Clone)]
pub struct AppContext {
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub auth: Arc<dyn AuthService>,
    db: Option<Db>,
}

impl AppContext {
    /// Connect to `MongoDB`, ensure indexes and wire the services.
    ///
    /// # Errors
    ///
    /// Returns an error when the store is unreachable or index creation fails.
    pub async fn init(
        uri: &str,
        database_name: &str,
        jwt: JwtSettings,
    ) -> Result<Self, AppInitError> {
        let db = database::init(uri, database_name)
            .await
            .map_err(AppInitError::Database)?;

        Ok(Self::from_db(db, jwt))
    }

    #[must_use]
    pub fn from_db(db: Db, jwt: JwtSettings) -> Self {
        Self {
            carts: Arc::new(MongoCartsService::new(&db)),
            orders: Arc::new(MongoOrdersService::new(&db)),
            auth: Arc::new(JwtAuthService::new(jwt)),
            db: Some(db),
        }
    }

    /// Context over arbitrary service implementations, with no store to close.
    #[must_use]
    pub fn from_services(
        carts: Arc<dyn CartsService>,
        orders: Arc<dyn OrdersService>,
        auth: Arc<dyn AuthService>,
    ) -> Self {
        Self {
            carts,
            orders,
            auth,
            db: None,
        }
    }

    /// Check the store is still reachable. Contexts without a store are always healthy.
    ///
    /// # Errors
    ///
    /// Returns the driver error when the ping fails.
    pub async fn ping(&self) -> Result<(), mongodb::error::Error> {
        match &self.db {
            Some(db) => db.ping().await,
            None => Ok(()),
        }
    }

    /// Release the store connection pool.
    pub async fn close(self) {
        if let Some(db) = self.db {
            db.close().await;
        }

        info!("application context closed");
    }
}
