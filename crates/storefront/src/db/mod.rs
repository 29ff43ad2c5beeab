//! Order persistence.
//!
//! # Database: `thecandyshop`
//!
//! ## Collections
//!
//! - `orders` - One document per placed order (see [`mongo::OrderDocument`])
//!
//! Handlers only see the [`OrderStore`] trait. [`MongoOrderStore`] is the
//! production backend; [`InMemoryOrderStore`] serves local development and
//! tests.

pub mod memory;
pub mod mongo;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use mongodb::options::ClientOptions;
use secrecy::ExposeSecret;

use candy_shop_core::{Order, OrderId};

use crate::config::{StorageBackend, StorefrontConfig};

pub use memory::InMemoryOrderStore;
pub use mongo::MongoOrderStore;

/// Error type for order store operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Error from the MongoDB driver.
    #[error("database error: {0}")]
    Database(#[from] mongodb::error::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The store cannot serve requests (e.g. a poisoned lock).
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// An order together with the ID the store assigned to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredOrder {
    pub id: OrderId,
    pub order: Order,
}

/// Persistence boundary for orders.
///
/// Orders are write-once: there is no update or delete.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a new order and return its ID.
    async fn save(&self, order: &Order) -> Result<OrderId, RepositoryError>;

    /// All orders, oldest first.
    async fn find_all(&self) -> Result<Vec<StoredOrder>, RepositoryError>;

    /// The first order whose customer name contains `needle`, ignoring case.
    ///
    /// `needle` is matched literally, not as a pattern.
    async fn find_by_name_contains(
        &self,
        needle: &str,
    ) -> Result<Option<StoredOrder>, RepositoryError>;

    /// Check that the store is reachable.
    async fn health_check(&self) -> Result<(), RepositoryError>;
}

/// Create the order store selected by configuration.
///
/// The MongoDB driver connects lazily, so this only fails on a malformed
/// connection string.
///
/// # Errors
///
/// Returns `RepositoryError::Database` if the connection string cannot be parsed.
pub async fn create_store(
    config: &StorefrontConfig,
) -> Result<Arc<dyn OrderStore>, RepositoryError> {
    match config.storage {
        StorageBackend::Memory => Ok(Arc::new(InMemoryOrderStore::new())),
        StorageBackend::MongoDb => {
            let mut options = ClientOptions::parse(config.mongodb.url.expose_secret()).await?;
            options.app_name = Some("candy-shop-storefront".to_string());
            options.server_selection_timeout = Some(Duration::from_secs(5));
            options.connect_timeout = Some(Duration::from_secs(10));

            let client = mongodb::Client::with_options(options)?;
            let database = client.database(&config.mongodb.database);
            Ok(Arc::new(MongoOrderStore::new(&database)))
        }
    }
}

#[cfg(test)]
pub mod testing {
    //! Store doubles for handler tests.

    use async_trait::async_trait;

    use candy_shop_core::{Order, OrderId};

    use super::{OrderStore, RepositoryError, StoredOrder};

    /// A store whose every operation fails.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FailingOrderStore;

    fn unavailable() -> RepositoryError {
        RepositoryError::Unavailable("store offline".to_string())
    }

    #[async_trait]
    impl OrderStore for FailingOrderStore {
        async fn save(&self, _order: &Order) -> Result<OrderId, RepositoryError> {
            Err(unavailable())
        }

        async fn find_all(&self) -> Result<Vec<StoredOrder>, RepositoryError> {
            Err(unavailable())
        }

        async fn find_by_name_contains(
            &self,
            _needle: &str,
        ) -> Result<Option<StoredOrder>, RepositoryError> {
            Err(unavailable())
        }

        async fn health_check(&self) -> Result<(), RepositoryError> {
            Err(unavailable())
        }
    }
}
