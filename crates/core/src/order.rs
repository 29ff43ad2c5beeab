//! Order form input and the priced order record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::pricing::PricedOrder;
use crate::types::{Email, Phone};

/// Raw order form submission.
///
/// Every field arrives as a string exactly as the browser sent it. Unknown
/// fields are rejected at deserialization so typos in the form fail loudly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderForm {
    pub name: String,
    pub address: String,
    pub city: String,
    pub province: String,
    pub email: String,
    pub phone: String,
    pub dark_roasted_coffee_toffee: String,
    pub coffee_caramel_bars: String,
    pub coffee_chocolate_mousse: String,
    pub coffee_chocolate_donuts: String,
    pub coffee_chocolate_chip_cookie: String,
    pub assorted_packs: String,
}

impl OrderForm {
    /// Raw quantity submitted for `product`.
    #[must_use]
    pub fn quantity(&self, product: Product) -> &str {
        match product {
            Product::DarkRoastedCoffeeToffee => &self.dark_roasted_coffee_toffee,
            Product::CoffeeCaramelBars => &self.coffee_caramel_bars,
            Product::CoffeeChocolateMousse => &self.coffee_chocolate_mousse,
            Product::CoffeeChocolateDonuts => &self.coffee_chocolate_donuts,
            Product::CoffeeChocolateChipCookie => &self.coffee_chocolate_chip_cookie,
            Product::AssortedPacks => &self.assorted_packs,
        }
    }

    /// Raw quantities indexed like [`Product::ALL`].
    #[must_use]
    pub fn raw_quantities(&self) -> [&str; Product::COUNT] {
        Product::ALL.map(|product| self.quantity(product))
    }
}

/// Validated customer contact and shipping details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub address: String,
    pub city: String,
    /// Region key, as used by the [`TaxTable`](crate::tax::TaxTable).
    pub province: String,
    pub email: Email,
    pub phone: Phone,
}

/// A validated, priced customer order.
///
/// The pricing fields always satisfy the invariants enforced by
/// [`PricingEngine`](crate::pricing::PricingEngine): line totals are
/// quantity times unit price, the total is their sum, and the overall total
/// is total plus tax.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub customer: Customer,
    pub pricing: PricedOrder,
    /// When the order was placed. Orders recorded before timestamps were
    /// kept have `None`.
    pub placed_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Build a new order placed now.
    #[must_use]
    pub fn new(customer: Customer, pricing: PricedOrder) -> Self {
        Self {
            customer,
            pricing,
            placed_at: Some(Utc::now()),
        }
    }

    /// Case-insensitive substring match on the customer name.
    ///
    /// ```
    /// # use candy_shop_core::{Customer, Email, Order, Phone, PricingEngine};
    /// # let engine = PricingEngine::default();
    /// # let pricing = engine.price(["1", "", "", "", "", ""], "Ontario").unwrap();
    /// # let customer = Customer {
    /// #     name: "Jane Doe".into(), address: "1 King St".into(), city: "Toronto".into(),
    /// #     province: "Ontario".into(), email: Email::parse("jane@example.com").unwrap(),
    /// #     phone: Phone::parse("416-555-0100").unwrap(),
    /// # };
    /// let order = Order::new(customer, pricing);
    /// assert!(order.name_contains("DOE"));
    /// assert!(!order.name_contains("smith"));
    /// ```
    #[must_use]
    pub fn name_contains(&self, needle: &str) -> bool {
        self.customer
            .name
            .to_lowercase()
            .contains(&needle.to_lowercase())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form_json() -> &'static str {
        r#"{
            "name": "Jane",
            "address": "1 King St",
            "city": "Toronto",
            "province": "Ontario",
            "email": "jane@example.com",
            "phone": "416-555-0100",
            "darkRoastedCoffeeToffee": "2",
            "coffeeCaramelBars": "",
            "coffeeChocolateMousse": "0",
            "coffeeChocolateDonuts": "",
            "coffeeChocolateChipCookie": "",
            "assortedPacks": "1"
        }"#
    }

    #[test]
    fn test_form_uses_camel_case_field_names() {
        let form: OrderForm = serde_json::from_str(form_json()).unwrap();
        assert_eq!(form.dark_roasted_coffee_toffee, "2");
        assert_eq!(form.assorted_packs, "1");
        assert_eq!(form.raw_quantities(), ["2", "", "0", "", "", "1"]);
    }

    #[test]
    fn test_form_rejects_unknown_fields() {
        let json = form_json().replace("\"assortedPacks\"", "\"assortedPack\"");
        assert!(serde_json::from_str::<OrderForm>(&json).is_err());
    }

    #[test]
    fn test_form_rejects_missing_fields() {
        let json = r#"{ "name": "Jane" }"#;
        assert!(serde_json::from_str::<OrderForm>(json).is_err());
    }

    #[test]
    fn test_quantity_lookup_matches_field_name() {
        let form: OrderForm = serde_json::from_str(form_json()).unwrap();
        let value: serde_json::Value = serde_json::from_str(form_json()).unwrap();
        for product in Product::ALL {
            assert_eq!(
                Some(form.quantity(product)),
                value[product.field_name()].as_str()
            );
        }
    }
}
