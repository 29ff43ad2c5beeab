//! Order form route handlers.
//!
//! `GET /products` shows the catalog as an order form. `POST /product`
//! validates the submission, prices it, stores it and renders a receipt.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{State, rejection::FormRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{Span, instrument};

use candy_shop_core::{Order, OrderForm, PricingEngine, PricingError, ValidationError, validation};

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::routes::orders::OrderView;
use crate::state::AppState;

/// A catalog row of the order form.
#[derive(Clone)]
pub struct ProductRow {
    /// Form field name, e.g. `darkRoastedCoffeeToffee`.
    pub field: &'static str,
    pub name: &'static str,
    pub unit_price: String,
    /// Quantity echoed back from a rejected submission.
    pub quantity: String,
}

/// A region choice in the province select.
#[derive(Clone)]
pub struct RegionOption {
    pub key: String,
    pub label: String,
    pub selected: bool,
}

/// A failed check shown above the form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ErrorView {
    pub code: &'static str,
    pub field: &'static str,
    pub message: String,
}

impl From<&ValidationError> for ErrorView {
    fn from(error: &ValidationError) -> Self {
        Self {
            code: error.code(),
            field: error.field(),
            message: error.to_string(),
        }
    }
}

impl From<&PricingError> for ErrorView {
    fn from(error: &PricingError) -> Self {
        Self {
            code: error.code(),
            field: "province",
            message: error.to_string(),
        }
    }
}

/// Order form page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/form.html")]
pub struct OrderFormTemplate {
    pub form: OrderForm,
    pub products: Vec<ProductRow>,
    pub regions: Vec<RegionOption>,
    pub errors: Vec<ErrorView>,
}

impl OrderFormTemplate {
    /// An empty form.
    #[must_use]
    pub fn blank(pricing: &PricingEngine) -> Self {
        Self::filled(pricing, OrderForm::default(), Vec::new())
    }

    /// A form holding the customer's previous input and the reasons it was
    /// rejected.
    #[must_use]
    pub fn filled(pricing: &PricingEngine, form: OrderForm, errors: Vec<ErrorView>) -> Self {
        let products = pricing
            .catalog()
            .entries()
            .map(|(product, price)| ProductRow {
                field: product.field_name(),
                name: product.display_name(),
                unit_price: price.to_string(),
                quantity: form.quantity(product).to_owned(),
            })
            .collect();

        let selected = form.province.trim();
        let regions = pricing
            .tax_table()
            .regions()
            .map(|region| RegionOption {
                key: region.key.clone(),
                label: region.label.clone(),
                selected: region.key == selected,
            })
            .collect();

        Self {
            form,
            products,
            regions,
            errors,
        }
    }
}

/// Receipt page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/receipt.html")]
pub struct ReceiptTemplate {
    pub order: OrderView,
}

/// Display the order form.
#[instrument(skip(state))]
pub async fn form(State(state): State<AppState>) -> impl IntoResponse {
    OrderFormTemplate::blank(state.pricing())
}

/// Handle an order submission.
///
/// Rejected submissions re-render the form with a 422 status. A submission
/// with no product selected gets a fresh form and is not stored.
#[instrument(
    skip(state, form),
    fields(province = tracing::field::Empty, order_id = tracing::field::Empty)
)]
pub async fn submit(
    State(state): State<AppState>,
    form: std::result::Result<Form<OrderForm>, FormRejection>,
) -> Result<Response> {
    let Form(form) = form.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let span = Span::current();
    span.record("province", form.province.trim());
    add_breadcrumb(
        "order",
        "Order submitted",
        Some(&[("province", form.province.trim())]),
    );

    let customer = match validation::validate(&form) {
        Ok(customer) => customer,
        Err(errors) => {
            let codes: Vec<_> = errors.iter().map(ValidationError::code).collect();
            tracing::info!(?codes, "Order rejected by validation");
            let errors = errors.iter().map(ErrorView::from).collect();
            return Ok(rejected(state.pricing(), form, errors));
        }
    };

    let pricing = match state
        .pricing()
        .price(form.raw_quantities(), &customer.province)
    {
        Ok(pricing) => pricing,
        Err(PricingError::NoProductSelected) => {
            tracing::info!("No product selected, showing a fresh form");
            return Ok(OrderFormTemplate::blank(state.pricing()).into_response());
        }
        Err(error @ PricingError::UnknownRegion(_)) => {
            tracing::info!(code = error.code(), "Order rejected by pricing");
            return Ok(rejected(state.pricing(), form, vec![ErrorView::from(&error)]));
        }
    };

    let order = Order::new(customer, pricing);
    let id = state.orders().save(&order).await?;

    span.record("order_id", id.as_str());
    tracing::info!(
        overall_total = %order.pricing.overall_total,
        items = order.pricing.selected_lines().count(),
        "Order placed"
    );

    let view = OrderView::new(&id, &order, state.pricing().tax_table());
    Ok(ReceiptTemplate { order: view }.into_response())
}

fn rejected(pricing: &PricingEngine, form: OrderForm, errors: Vec<ErrorView>) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        OrderFormTemplate::filled(pricing, form, errors),
    )
        .into_response()
}
