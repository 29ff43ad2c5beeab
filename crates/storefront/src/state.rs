//! Application state shared across handlers.

use std::sync::Arc;

use candy_shop_core::PricingEngine;

use crate::config::StorefrontConfig;
use crate::db::OrderStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the order store, the pricing rules and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    orders: Arc<dyn OrderStore>,
    pricing: PricingEngine,
}

impl AppState {
    /// Create a new application state with the standard catalog and tax table.
    #[must_use]
    pub fn new(config: StorefrontConfig, orders: Arc<dyn OrderStore>) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                orders,
                pricing: PricingEngine::default(),
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the order store.
    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        self.inner.orders.as_ref()
    }

    /// Get a reference to the pricing engine.
    #[must_use]
    pub fn pricing(&self) -> &PricingEngine {
        &self.inner.pricing
    }
}
