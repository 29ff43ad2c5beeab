//! MongoDB order store.
//!
//! Orders live in a flat document whose keys match the order form field
//! names, so documents written by earlier versions of the shop stay
//! readable. Numbers are BSON doubles; the store converts them to and from
//! exact decimals at the boundary.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::{Collection, Database};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use serde::{Deserialize, Serialize};

use candy_shop_core::{
    Customer, Email, Order, OrderId, OrderLine, Phone, Price, PricedOrder, Product,
};

use super::{OrderStore, RepositoryError, StoredOrder};

/// Name of the orders collection.
pub const ORDERS_COLLECTION: &str = "orders";

/// Stored shape of one order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    pub address: String,
    pub province: String,
    pub city: String,
    pub email: String,
    pub phone: String,
    pub dark_roasted_coffee_toffee: f64,
    pub dark_roasted_coffee_toffee_total: f64,
    pub coffee_caramel_bars: f64,
    pub coffee_caramel_bars_total: f64,
    pub coffee_chocolate_mousse: f64,
    pub coffee_chocolate_mousse_total: f64,
    pub coffee_chocolate_donuts: f64,
    pub coffee_chocolate_donuts_total: f64,
    pub coffee_chocolate_chip_cookie: f64,
    pub coffee_chocolate_chip_cookie_total: f64,
    pub assorted_packs: f64,
    pub assorted_packs_total: f64,
    pub total: f64,
    pub tax: f64,
    pub overall_total: f64,
    /// Absent on documents written before the rate was recorded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placed_at: Option<bson::DateTime>,
}

impl OrderDocument {
    /// Quantity and line total fields for `product`.
    fn line_fields(&self, product: Product) -> (f64, f64) {
        match product {
            Product::DarkRoastedCoffeeToffee => (
                self.dark_roasted_coffee_toffee,
                self.dark_roasted_coffee_toffee_total,
            ),
            Product::CoffeeCaramelBars => {
                (self.coffee_caramel_bars, self.coffee_caramel_bars_total)
            }
            Product::CoffeeChocolateMousse => (
                self.coffee_chocolate_mousse,
                self.coffee_chocolate_mousse_total,
            ),
            Product::CoffeeChocolateDonuts => (
                self.coffee_chocolate_donuts,
                self.coffee_chocolate_donuts_total,
            ),
            Product::CoffeeChocolateChipCookie => (
                self.coffee_chocolate_chip_cookie,
                self.coffee_chocolate_chip_cookie_total,
            ),
            Product::AssortedPacks => (self.assorted_packs, self.assorted_packs_total),
        }
    }

    /// Convert a domain order into its stored shape.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if an amount has no `f64` form.
    pub fn from_order(order: &Order) -> Result<Self, RepositoryError> {
        let pricing = &order.pricing;
        let line = |product: Product| -> Result<(f64, f64), RepositoryError> {
            let line = pricing.line(product).ok_or_else(|| {
                RepositoryError::DataCorruption(format!("order has no line for {product:?}"))
            })?;
            Ok((f64::from(line.quantity), price_to_f64(line.line_total)?))
        };

        let (toffee, toffee_total) = line(Product::DarkRoastedCoffeeToffee)?;
        let (bars, bars_total) = line(Product::CoffeeCaramelBars)?;
        let (mousse, mousse_total) = line(Product::CoffeeChocolateMousse)?;
        let (donuts, donuts_total) = line(Product::CoffeeChocolateDonuts)?;
        let (cookie, cookie_total) = line(Product::CoffeeChocolateChipCookie)?;
        let (packs, packs_total) = line(Product::AssortedPacks)?;

        Ok(Self {
            id: None,
            name: order.customer.name.clone(),
            address: order.customer.address.clone(),
            province: order.customer.province.clone(),
            city: order.customer.city.clone(),
            email: order.customer.email.as_str().to_owned(),
            phone: order.customer.phone.as_str().to_owned(),
            dark_roasted_coffee_toffee: toffee,
            dark_roasted_coffee_toffee_total: toffee_total,
            coffee_caramel_bars: bars,
            coffee_caramel_bars_total: bars_total,
            coffee_chocolate_mousse: mousse,
            coffee_chocolate_mousse_total: mousse_total,
            coffee_chocolate_donuts: donuts,
            coffee_chocolate_donuts_total: donuts_total,
            coffee_chocolate_chip_cookie: cookie,
            coffee_chocolate_chip_cookie_total: cookie_total,
            assorted_packs: packs,
            assorted_packs_total: packs_total,
            total: price_to_f64(pricing.total)?,
            tax: price_to_f64(pricing.tax)?,
            overall_total: price_to_f64(pricing.overall_total)?,
            tax_rate: Some(decimal_to_f64(pricing.tax_rate)?),
            placed_at: order
                .placed_at
                .map(|at| bson::DateTime::from_millis(at.timestamp_millis())),
        })
    }

    /// Convert a stored document back into a domain order.
    ///
    /// Unit prices are recovered as `line_total / quantity` (zero for empty
    /// lines), since the document does not record them.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::DataCorruption` if the document lacks an ID,
    /// holds an invalid email or phone, or has a non-finite or fractional
    /// number where one is not allowed.
    pub fn into_stored(self) -> Result<StoredOrder, RepositoryError> {
        let id = self
            .id
            .ok_or_else(|| RepositoryError::DataCorruption("order document has no _id".into()))?;

        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in order {id}: {e}"))
        })?;
        let phone = Phone::parse(&self.phone).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid phone in order {id}: {e}"))
        })?;

        let lines = Product::ALL
            .into_iter()
            .map(|product| -> Result<OrderLine, RepositoryError> {
                let (quantity, line_total) = self.line_fields(product);
                let quantity = f64_to_quantity(quantity)?;
                let line_total = f64_to_decimal(line_total)?;
                let unit_price = if quantity == 0 {
                    Decimal::ZERO
                } else {
                    line_total / Decimal::from(quantity)
                };
                Ok(OrderLine {
                    product,
                    quantity,
                    unit_price: Price::new(unit_price),
                    line_total: Price::new(line_total),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let total = f64_to_decimal(self.total)?;
        let tax = f64_to_decimal(self.tax)?;
        let tax_rate = match self.tax_rate {
            Some(rate) => f64_to_decimal(rate)?,
            None if total.is_zero() => Decimal::ZERO,
            None => (tax * Decimal::ONE_HUNDRED / total).round_dp(3),
        };

        let order = Order {
            customer: Customer {
                name: self.name,
                address: self.address,
                city: self.city,
                province: self.province,
                email,
                phone,
            },
            pricing: PricedOrder {
                lines,
                total: Price::new(total),
                tax_rate,
                tax: Price::new(tax),
                overall_total: Price::new(f64_to_decimal(self.overall_total)?),
            },
            placed_at: self
                .placed_at
                .and_then(|at| DateTime::<Utc>::from_timestamp_millis(at.timestamp_millis())),
        };

        Ok(StoredOrder {
            id: OrderId::new(id.to_hex()),
            order,
        })
    }
}

fn price_to_f64(price: Price) -> Result<f64, RepositoryError> {
    decimal_to_f64(price.amount())
}

fn decimal_to_f64(value: Decimal) -> Result<f64, RepositoryError> {
    value
        .to_f64()
        .ok_or_else(|| RepositoryError::DataCorruption(format!("amount {value} has no f64 form")))
}

/// Convert a stored double to a decimal, dropping binary noise beyond the
/// double's shortest round-trip representation.
fn f64_to_decimal(value: f64) -> Result<Decimal, RepositoryError> {
    Decimal::from_f64(value)
        .map(|d| d.normalize())
        .ok_or_else(|| {
            RepositoryError::DataCorruption(format!("stored amount {value} is not a finite number"))
        })
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn f64_to_quantity(value: f64) -> Result<u32, RepositoryError> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= f64::from(u32::MAX) {
        Ok(value as u32)
    } else {
        Err(RepositoryError::DataCorruption(format!(
            "stored quantity {value} is not a whole non-negative number"
        )))
    }
}

/// Escape `needle` so MongoDB's `$regex` matches it literally.
fn literal_pattern(needle: &str) -> String {
    regex::escape(needle)
}

/// Order store backed by a MongoDB collection.
#[derive(Clone, Debug)]
pub struct MongoOrderStore {
    database: Database,
    orders: Collection<OrderDocument>,
}

impl MongoOrderStore {
    /// Create a store over the `orders` collection of `database`.
    #[must_use]
    pub fn new(database: &Database) -> Self {
        Self {
            database: database.clone(),
            orders: database.collection(ORDERS_COLLECTION),
        }
    }
}

#[async_trait]
impl OrderStore for MongoOrderStore {
    async fn save(&self, order: &Order) -> Result<OrderId, RepositoryError> {
        let document = OrderDocument::from_order(order)?;
        let result = self.orders.insert_one(document).await?;

        let id = result.inserted_id.as_object_id().ok_or_else(|| {
            RepositoryError::DataCorruption(format!(
                "insert returned a non-ObjectId _id: {}",
                result.inserted_id
            ))
        })?;

        tracing::debug!(order_id = %id, "Order document inserted");
        Ok(OrderId::new(id.to_hex()))
    }

    async fn find_all(&self) -> Result<Vec<StoredOrder>, RepositoryError> {
        let documents: Vec<OrderDocument> = self
            .orders
            .find(doc! {})
            .sort(doc! { "_id": 1 })
            .await?
            .try_collect()
            .await?;

        let orders = documents
            .into_iter()
            .filter_map(|document| match document.into_stored() {
                Ok(stored) => Some(stored),
                Err(e) => {
                    tracing::warn!(error = %e, "Skipping unreadable order document");
                    None
                }
            })
            .collect();

        Ok(orders)
    }

    async fn find_by_name_contains(
        &self,
        needle: &str,
    ) -> Result<Option<StoredOrder>, RepositoryError> {
        let filter = doc! {
            "name": { "$regex": literal_pattern(needle), "$options": "i" }
        };

        self.orders
            .find_one(filter)
            .sort(doc! { "_id": 1 })
            .await?
            .map(OrderDocument::into_stored)
            .transpose()
    }

    async fn health_check(&self) -> Result<(), RepositoryError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use candy_shop_core::{PricingEngine, validation};

    use super::*;

    fn sample_order(province: &str, quantities: [&str; 6]) -> Order {
        let customer = Customer {
            name: "Jane Doe".to_owned(),
            address: "1 King St W".to_owned(),
            city: "Toronto".to_owned(),
            province: province.to_owned(),
            email: validation::check_email("jane@example.com").unwrap(),
            phone: validation::check_phone("416-555-0100").unwrap(),
        };
        let pricing = PricingEngine::default().price(quantities, province).unwrap();
        Order::new(customer, pricing)
    }

    #[test]
    fn test_document_uses_form_field_names() {
        let order = sample_order("Ontario", ["2", "", "", "", "", "1"]);
        let document = bson::to_document(&OrderDocument::from_order(&order).unwrap()).unwrap();

        assert!(document.get("_id").is_none());
        assert_eq!(document.get_f64("darkRoastedCoffeeToffee").unwrap(), 2.0);
        assert_eq!(document.get_f64("darkRoastedCoffeeToffeeTotal").unwrap(), 30.0);
        assert_eq!(document.get_f64("assortedPacks").unwrap(), 1.0);
        assert_eq!(document.get_f64("assortedPacksTotal").unwrap(), 15.0);
        assert_eq!(document.get_f64("total").unwrap(), 45.0);
        assert_eq!(document.get_f64("tax").unwrap(), 5.85);
        assert_eq!(document.get_f64("overallTotal").unwrap(), 50.85);
        assert_eq!(document.get_f64("taxRate").unwrap(), 13.0);
        assert_eq!(document.get_str("province").unwrap(), "Ontario");
        assert!(document.get_datetime("placedAt").is_ok());
    }

    #[test]
    fn test_document_converts_back_to_order() {
        let order = sample_order("Ontario", ["2", "0", "0", "0", "0", "0"]);
        let mut document = OrderDocument::from_order(&order).unwrap();
        document.id = Some(ObjectId::new());

        let stored = document.into_stored().unwrap();
        let pricing = &stored.order.pricing;
        assert_eq!(stored.order.customer, order.customer);
        assert_eq!(pricing.total, Price::from_units(30));
        assert_eq!(pricing.tax.amount(), Decimal::new(39, 1));
        assert_eq!(pricing.overall_total.amount(), Decimal::new(339, 1));
        assert_eq!(pricing.tax_rate, Decimal::from(13));
        let toffee = pricing.line(Product::DarkRoastedCoffeeToffee).unwrap();
        assert_eq!(toffee.unit_price, Price::from_units(15));
        assert_eq!(
            stored.order.placed_at.map(|t| t.timestamp_millis()),
            order.placed_at.map(|t| t.timestamp_millis())
        );
    }

    #[test]
    fn test_legacy_document_without_rate_or_timestamp() {
        let document: OrderDocument = bson::from_document(doc! {
            "_id": ObjectId::new(),
            "name": "Sam", "address": "2 Main St", "province": "Alberta",
            "city": "Calgary", "email": "sam@example.com", "phone": "403-555-0100",
            "darkRoastedCoffeeToffee": 0.0, "darkRoastedCoffeeToffeeTotal": 0.0,
            "coffeeCaramelBars": 1.0, "coffeeCaramelBarsTotal": 12.0,
            "coffeeChocolateMousse": 0.0, "coffeeChocolateMousseTotal": 0.0,
            "coffeeChocolateDonuts": 0.0, "coffeeChocolateDonutsTotal": 0.0,
            "coffeeChocolateChipCookie": 0.0, "coffeeChocolateChipCookieTotal": 0.0,
            "assortedPacks": 0.0, "assortedPacksTotal": 0.0,
            "total": 12.0, "tax": 0.6, "overallTotal": 12.6,
        })
        .unwrap();

        let stored = document.into_stored().unwrap();
        assert_eq!(stored.order.placed_at, None);
        assert_eq!(stored.order.pricing.tax_rate, Decimal::from(5));
        assert_eq!(stored.order.pricing.tax.amount(), Decimal::new(6, 1));
    }

    #[test]
    fn test_nan_tax_is_data_corruption() {
        let order = sample_order("Yukon", ["1", "", "", "", "", ""]);
        let mut document = OrderDocument::from_order(&order).unwrap();
        document.id = Some(ObjectId::new());
        document.tax = f64::NAN;
        document.overall_total = f64::NAN;

        assert!(matches!(
            document.into_stored(),
            Err(RepositoryError::DataCorruption(_))
        ));
    }

    #[test]
    fn test_fractional_quantity_is_data_corruption() {
        assert!(f64_to_quantity(2.0).is_ok());
        assert!(f64_to_quantity(2.5).is_err());
        assert!(f64_to_quantity(-1.0).is_err());
        assert!(f64_to_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_literal_pattern_escapes_regex_syntax() {
        assert_eq!(literal_pattern("jane"), "jane");
        assert_eq!(literal_pattern("a.b*"), r"a\.b\*");
        assert_eq!(literal_pattern("(x)"), r"\(x\)");
    }
}
