//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Home page
//!
//! # Ordering
//! GET  /products         - Catalog and order form
//! POST /product          - Submit an order (urlencoded form)
//!
//! # Orders
//! GET  /orders           - All orders, oldest first
//! GET  /orders/{name}    - First order whose customer name contains {name}
//! ```
//!
//! Health checks and static assets are mounted in [`crate::app`].

pub mod home;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the order lookup routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{name}", get(orders::show))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(home::home))
        // Order form and submission
        .route("/products", get(products::form))
        .route("/product", post(products::submit))
        // Order lookup
        .nest("/orders", order_routes())
}
