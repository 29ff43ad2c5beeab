//! The fixed product catalog.
//!
//! The shop sells exactly six products. Their order here is the order they
//! appear on the order form, on receipts, and in pricing input arrays.

use serde::{Deserialize, Serialize};

use crate::types::Price;

/// One of the six products on the order form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Product {
    DarkRoastedCoffeeToffee,
    CoffeeCaramelBars,
    CoffeeChocolateMousse,
    CoffeeChocolateDonuts,
    CoffeeChocolateChipCookie,
    AssortedPacks,
}

impl Product {
    /// Number of products in the catalog.
    pub const COUNT: usize = 6;

    /// Every product, in form order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::DarkRoastedCoffeeToffee,
        Self::CoffeeCaramelBars,
        Self::CoffeeChocolateMousse,
        Self::CoffeeChocolateDonuts,
        Self::CoffeeChocolateChipCookie,
        Self::AssortedPacks,
    ];

    /// Name of the quantity field on the order form and in stored documents.
    #[must_use]
    pub const fn field_name(self) -> &'static str {
        match self {
            Self::DarkRoastedCoffeeToffee => "darkRoastedCoffeeToffee",
            Self::CoffeeCaramelBars => "coffeeCaramelBars",
            Self::CoffeeChocolateMousse => "coffeeChocolateMousse",
            Self::CoffeeChocolateDonuts => "coffeeChocolateDonuts",
            Self::CoffeeChocolateChipCookie => "coffeeChocolateChipCookie",
            Self::AssortedPacks => "assortedPacks",
        }
    }

    /// Human-readable product name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::DarkRoastedCoffeeToffee => "Dark Roasted Coffee Toffee",
            Self::CoffeeCaramelBars => "Coffee Caramel Bars",
            Self::CoffeeChocolateMousse => "Coffee Chocolate Mousse",
            Self::CoffeeChocolateDonuts => "Coffee Chocolate Donuts",
            Self::CoffeeChocolateChipCookie => "Coffee Chocolate Chip Cookie",
            Self::AssortedPacks => "Assorted Packs",
        }
    }

    /// Position of this product in [`Product::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Unit prices for every product.
///
/// Built once at startup and handed to the
/// [`PricingEngine`](crate::pricing::PricingEngine); nothing mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    unit_prices: [Price; Product::COUNT],
}

impl Catalog {
    /// The shop's published unit prices.
    #[must_use]
    pub fn standard() -> Self {
        Self::with_unit_prices([15, 12, 17, 12, 10, 15].map(Price::from_units))
    }

    /// Build a catalog from explicit prices, indexed like [`Product::ALL`].
    #[must_use]
    pub const fn with_unit_prices(unit_prices: [Price; Product::COUNT]) -> Self {
        Self { unit_prices }
    }

    /// Unit price of `product`.
    #[must_use]
    pub fn unit_price(&self, product: Product) -> Price {
        self.unit_prices
            .get(product.index())
            .copied()
            .unwrap_or(Price::ZERO)
    }

    /// Iterate over `(product, unit price)` pairs in form order.
    pub fn entries(&self) -> impl Iterator<Item = (Product, Price)> + '_ {
        Product::ALL.into_iter().zip(self.unit_prices.iter().copied())
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_unit_prices() {
        let catalog = Catalog::standard();
        let prices: Vec<Price> = catalog.entries().map(|(_, price)| price).collect();
        assert_eq!(
            prices,
            [15, 12, 17, 12, 10, 15].map(Price::from_units).to_vec()
        );
        assert_eq!(
            catalog.unit_price(Product::CoffeeChocolateMousse),
            Price::from_units(17)
        );
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, product) in Product::ALL.iter().enumerate() {
            assert_eq!(product.index(), i);
        }
    }

    #[test]
    fn test_field_names_match_serde() {
        for product in Product::ALL {
            let json = serde_json::to_string(&product).unwrap();
            assert_eq!(json, format!("\"{}\"", product.field_name()));
        }
    }
}
