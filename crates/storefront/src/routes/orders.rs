//! Order listing and lookup route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::instrument;

use candy_shop_core::{Order, OrderId, TaxTable};

use crate::db::StoredOrder;
use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// One product line for templates.
#[derive(Clone)]
pub struct LineView {
    pub name: &'static str,
    pub quantity: u32,
    pub unit_price: String,
    pub line_total: String,
}

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub email: String,
    pub phone: String,
    /// Lines with a non-zero quantity.
    pub lines: Vec<LineView>,
    pub total: String,
    pub tax_rate: String,
    pub tax: String,
    pub overall_total: String,
    pub placed_at: String,
}

impl OrderView {
    /// Build the view of `order`, labelling its region from `tax_table`.
    #[must_use]
    pub fn new(id: &OrderId, order: &Order, tax_table: &TaxTable) -> Self {
        let customer = &order.customer;
        let pricing = &order.pricing;

        let province = tax_table
            .get(&customer.province)
            .map_or_else(|| customer.province.clone(), |region| region.label.clone());

        let lines = pricing
            .selected_lines()
            .map(|line| LineView {
                name: line.product.display_name(),
                quantity: line.quantity,
                unit_price: line.unit_price.to_string(),
                line_total: line.line_total.to_string(),
            })
            .collect();

        Self {
            id: id.to_string(),
            name: customer.name.clone(),
            address: customer.address.clone(),
            city: customer.city.clone(),
            province,
            email: customer.email.to_string(),
            phone: customer.phone.to_string(),
            lines,
            total: pricing.total.to_string(),
            tax_rate: format!("{}%", pricing.tax_rate.normalize()),
            tax: pricing.tax.to_string(),
            overall_total: pricing.overall_total.to_string(),
            placed_at: order.placed_at.map_or_else(
                || "Unknown".to_string(),
                |at| at.format("%Y-%m-%d %H:%M UTC").to_string(),
            ),
        }
    }

    fn from_stored(stored: &StoredOrder, tax_table: &TaxTable) -> Self {
        Self::new(&stored.id, &stored.order, tax_table)
    }
}

/// Order listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub orders: Vec<OrderView>,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub order: OrderView,
}

/// Order lookup miss template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/not_found.html")]
pub struct OrderNotFoundTemplate {
    pub needle: String,
}

/// Display every order.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let tax_table = state.pricing().tax_table();
    let orders = state
        .orders()
        .find_all()
        .await?
        .iter()
        .map(|stored| OrderView::from_stored(stored, tax_table))
        .collect::<Vec<_>>();

    tracing::debug!(count = orders.len(), "Listed orders");
    Ok(OrdersIndexTemplate { orders })
}

/// Display the first order whose customer name contains `name`.
#[instrument(skip(state))]
pub async fn show(State(state): State<AppState>, Path(name): Path<String>) -> Result<Response> {
    let found = state.orders().find_by_name_contains(&name).await?;

    let Some(stored) = found else {
        tracing::debug!("No order matched");
        let page = OrderNotFoundTemplate { needle: name };
        return Ok((StatusCode::NOT_FOUND, page).into_response());
    };

    let order = OrderView::from_stored(&stored, state.pricing().tax_table());
    Ok(OrderShowTemplate { order }.into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use axum::{
        Router,
        body::{Body, to_bytes},
        http::Request,
    };
    use candy_shop_core::{Customer, PricingEngine, validation};
    use tower::ServiceExt;

    use super::*;
    use crate::config::StorefrontConfig;
    use crate::db::testing::FailingOrderStore;
    use crate::db::{InMemoryOrderStore, OrderStore};

    fn order_for(name: &str, province: &str, quantities: [&str; 6]) -> Order {
        let customer = Customer {
            name: name.to_owned(),
            address: "1 King St W".to_owned(),
            city: "Toronto".to_owned(),
            province: province.to_owned(),
            email: validation::check_email("shopper@example.com").unwrap(),
            phone: validation::check_phone("416-555-0100").unwrap(),
        };
        let pricing = PricingEngine::default().price(quantities, province).unwrap();
        Order::new(customer, pricing)
    }

    async fn seeded_app() -> Router {
        let store = InMemoryOrderStore::new();
        store
            .save(&order_for("Jane Doe", "Ontario", ["2", "", "", "", "", ""]))
            .await
            .unwrap();
        store
            .save(&order_for("John Roe", "BritishColumbia", ["", "1", "", "", "", ""]))
            .await
            .unwrap();
        crate::app(AppState::new(StorefrontConfig::default(), Arc::new(store)))
    }

    async fn get_page(app: Router, path: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::get(path).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_index_lists_every_order() {
        let (status, html) = get_page(seeded_app().await, "/orders").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Jane Doe"));
        assert!(html.contains("John Roe"));
        assert!(html.contains("British Columbia"));
        assert!(html.find("Jane Doe").unwrap() < html.find("John Roe").unwrap());
    }

    #[tokio::test]
    async fn test_show_matches_name_ignoring_case() {
        let (status, html) = get_page(seeded_app().await, "/orders/jane").await;

        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Jane Doe"));
        assert!(!html.contains("John Roe"));
        assert!(html.contains("$33.90"));
    }

    #[tokio::test]
    async fn test_show_without_match_is_not_found() {
        let (status, html) = get_page(seeded_app().await, "/orders/zed").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(html.contains("zed"));
    }

    #[tokio::test]
    async fn test_index_store_failure_is_service_unavailable() {
        let app = crate::app(AppState::new(
            StorefrontConfig::default(),
            Arc::new(FailingOrderStore),
        ));
        let (status, _) = get_page(app, "/orders").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_order_view_formats_amounts() {
        let order = order_for("Jane Doe", "Quebec", ["", "", "", "", "1", ""]);
        let view = OrderView::new(&OrderId::new("abc"), &order, &TaxTable::canadian());

        assert_eq!(view.province, "Quebec");
        assert_eq!(view.lines.len(), 1);
        assert_eq!(view.lines[0].name, "Coffee Chocolate Chip Cookie");
        assert_eq!(view.total, "$10.00");
        assert_eq!(view.tax_rate, "14.975%");
        assert_eq!(view.tax, "$1.50");
        assert_eq!(view.overall_total, "$11.50");
    }
}
