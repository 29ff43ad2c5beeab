//! Candy Shop Core - order validation and pricing.
//!
//! This crate holds the business rules of the shop:
//! - what a well-formed order submission looks like ([`validation`])
//! - what each product costs ([`catalog`]) and how each region is taxed ([`tax`])
//! - how a submission becomes a priced [`Order`] ([`pricing`], [`order`])
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! database access, no HTTP. The `storefront` crate wires it to the web and
//! to storage.
//!
//! # Example
//!
//! ```
//! use candy_shop_core::{OrderForm, PricingEngine, validation};
//!
//! let form = OrderForm {
//!     name: "Jane Doe".into(),
//!     address: "1 King St W".into(),
//!     city: "Toronto".into(),
//!     province: "Ontario".into(),
//!     email: "jane@example.com".into(),
//!     phone: "416-555-0100".into(),
//!     dark_roasted_coffee_toffee: "2".into(),
//!     ..OrderForm::default()
//! };
//!
//! let customer = validation::validate(&form).expect("valid form");
//! let priced = PricingEngine::default()
//!     .price(form.raw_quantities(), &customer.province)
//!     .expect("priced");
//! assert_eq!(priced.overall_total.to_string(), "$33.90");
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod order;
pub mod pricing;
pub mod tax;
pub mod types;
pub mod validation;

pub use catalog::{Catalog, Product};
pub use order::{Customer, Order, OrderForm};
pub use pricing::{OrderLine, PricedOrder, PricingEngine, PricingError};
pub use tax::{Region, TaxTable};
pub use types::*;
pub use validation::ValidationError;
