//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::instrument;

use candy_shop_core::Product;

use crate::filters;
use crate::state::AppState;

/// A product teaser on the landing page.
#[derive(Clone)]
pub struct FeaturedProduct {
    pub name: &'static str,
    pub unit_price: String,
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub featured: Vec<FeaturedProduct>,
    pub product_count: usize,
}

/// Display the landing page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let featured = state
        .pricing()
        .catalog()
        .entries()
        .map(|(product, price)| FeaturedProduct {
            name: product.display_name(),
            unit_price: price.to_string(),
        })
        .collect();

    HomeTemplate {
        featured,
        product_count: Product::COUNT,
    }
}
