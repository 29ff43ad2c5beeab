//! Process-local order store.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use candy_shop_core::{Order, OrderId};

use super::{OrderStore, RepositoryError, StoredOrder};

/// Order store that keeps orders in memory, in insertion order.
///
/// Clones share the same orders.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<StoredOrder>>>,
}

impl InMemoryOrderStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.read()?.len())
    }

    /// Whether the store holds no orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Unavailable` if the lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<StoredOrder>>, RepositoryError> {
        self.orders
            .read()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<StoredOrder>>, RepositoryError> {
        self.orders
            .write()
            .map_err(|e| RepositoryError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn save(&self, order: &Order) -> Result<OrderId, RepositoryError> {
        let id = OrderId::new(Uuid::new_v4().simple().to_string());
        self.write()?.push(StoredOrder {
            id: id.clone(),
            order: order.clone(),
        });
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<StoredOrder>, RepositoryError> {
        Ok(self.read()?.clone())
    }

    async fn find_by_name_contains(
        &self,
        needle: &str,
    ) -> Result<Option<StoredOrder>, RepositoryError> {
        Ok(self
            .read()?
            .iter()
            .find(|stored| stored.order.name_contains(needle))
            .cloned())
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        self.read().map(|_| ())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use candy_shop_core::{Customer, PricingEngine, validation};

    use super::*;

    fn order_for(name: &str) -> Order {
        let customer = Customer {
            name: name.to_owned(),
            address: "1 King St W".to_owned(),
            city: "Toronto".to_owned(),
            province: "Ontario".to_owned(),
            email: validation::check_email("shopper@example.com").unwrap(),
            phone: validation::check_phone("416-555-0100").unwrap(),
        };
        let pricing = PricingEngine::default()
            .price(["1", "", "", "", "", ""], "Ontario")
            .unwrap();
        Order::new(customer, pricing)
    }

    #[tokio::test]
    async fn test_save_assigns_distinct_ids() {
        let store = InMemoryOrderStore::new();
        let first = store.save(&order_for("Jane Doe")).await.unwrap();
        let second = store.save(&order_for("John Roe")).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(store.len().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_find_all_keeps_insertion_order() {
        let store = InMemoryOrderStore::new();
        store.save(&order_for("Jane Doe")).await.unwrap();
        store.save(&order_for("John Roe")).await.unwrap();

        let names: Vec<_> = store
            .find_all()
            .await
            .unwrap()
            .into_iter()
            .map(|stored| stored.order.customer.name)
            .collect();
        assert_eq!(names, ["Jane Doe", "John Roe"]);
    }

    #[tokio::test]
    async fn test_find_by_name_contains_ignores_case() {
        let store = InMemoryOrderStore::new();
        store.save(&order_for("Jane Doe")).await.unwrap();
        store.save(&order_for("Janet Smith")).await.unwrap();

        let found = store.find_by_name_contains("JANE").await.unwrap().unwrap();
        assert_eq!(found.order.customer.name, "Jane Doe");

        assert!(store.find_by_name_contains("zed").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_name_contains_is_literal() {
        let store = InMemoryOrderStore::new();
        store.save(&order_for("Jane Doe")).await.unwrap();

        assert!(store.find_by_name_contains("J.ne").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_clones_share_orders() {
        let store = InMemoryOrderStore::new();
        let handle = store.clone();
        store.save(&order_for("Jane Doe")).await.unwrap();

        assert!(!handle.is_empty().unwrap());
        assert!(handle.health_check().await.is_ok());
    }
}
