//! Integration tests for the Candy Shop storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Start a storefront (in-memory storage is enough)
//! STOREFRONT_STORAGE=memory cargo run -p candy-shop-storefront
//!
//! # Run the ignored tests against it
//! STOREFRONT_BASE_URL=http://127.0.0.1:8080 \
//!     cargo test -p candy-shop-integration-tests -- --ignored
//! ```

use candy_shop_core::Product;

/// Base URL of the storefront under test.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8080".to_string())
}

/// A complete order form submission.
#[derive(Debug, Clone)]
pub struct OrderSubmission {
    pub name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub email: String,
    pub phone: String,
    /// Raw quantities, indexed like [`Product::ALL`].
    pub quantities: [String; Product::COUNT],
}

impl OrderSubmission {
    /// A valid Ontario customer ordering nothing yet.
    #[must_use]
    pub fn ontario(name: &str) -> Self {
        Self {
            name: name.to_string(),
            address: "1 King St W".to_string(),
            city: "Toronto".to_string(),
            province: "Ontario".to_string(),
            email: "shopper@example.com".to_string(),
            phone: "416-555-0100".to_string(),
            quantities: Default::default(),
        }
    }

    /// Set the quantity of `product`.
    #[must_use]
    pub fn with_quantity(mut self, product: Product, quantity: &str) -> Self {
        if let Some(slot) = self.quantities.get_mut(product.index()) {
            *slot = quantity.to_string();
        }
        self
    }

    /// Form fields in submission order, ready for `reqwest::RequestBuilder::form`.
    #[must_use]
    pub fn fields(&self) -> Vec<(&'static str, &str)> {
        let mut fields = vec![
            ("name", self.name.as_str()),
            ("address", self.address.as_str()),
            ("city", self.city.as_str()),
            ("province", self.province.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
        ];
        fields.extend(
            Product::ALL
                .iter()
                .zip(&self.quantities)
                .map(|(product, quantity)| (product.field_name(), quantity.as_str())),
        );
        fields
    }
}
