//! Order pricing engine.
//!
//! Turns raw per-product quantities and a region into line totals, an
//! aggregate total, tax and an overall total. All arithmetic is exact
//! decimal arithmetic, so `overall_total == total + tax` holds exactly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Product};
use crate::tax::TaxTable;
use crate::types::Price;

/// Reasons the engine declines to price a submission.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PricingError {
    /// Every quantity coerced to zero.
    #[error("Select at least one product")]
    NoProductSelected,
    /// The region is not in the tax table.
    #[error("We do not ship to {0:?}. Choose a province or territory from the list")]
    UnknownRegion(String),
}

impl PricingError {
    /// Stable error code, suitable for templates and logs.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::NoProductSelected => "NoProductSelected",
            Self::UnknownRegion(_) => "UnknownRegion",
        }
    }
}

/// One product line of a priced order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product: Product,
    pub quantity: u32,
    pub unit_price: Price,
    /// `quantity * unit_price`.
    pub line_total: Price,
}

/// Pricing fields of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedOrder {
    /// One line per catalog product, in [`Product::ALL`] order, zero
    /// quantities included.
    pub lines: Vec<OrderLine>,
    /// Sum of all line totals.
    pub total: Price,
    /// Percentage rate applied.
    pub tax_rate: Decimal,
    /// `total * tax_rate / 100`, unrounded.
    pub tax: Price,
    /// `total + tax`.
    pub overall_total: Price,
}

impl PricedOrder {
    /// The line for `product`.
    #[must_use]
    pub fn line(&self, product: Product) -> Option<&OrderLine> {
        self.lines.iter().find(|line| line.product == product)
    }

    /// Lines with a non-zero quantity.
    pub fn selected_lines(&self) -> impl Iterator<Item = &OrderLine> {
        self.lines.iter().filter(|line| line.quantity > 0)
    }
}

/// Coerce a raw quantity string to a count.
///
/// Policy: surrounding whitespace is ignored, anything after a decimal
/// point is discarded, and any input that still doesn't parse as an
/// unsigned integer (empty, letters, a sign, overflow) counts as zero.
///
/// ```
/// use candy_shop_core::pricing::coerce_quantity;
///
/// assert_eq!(coerce_quantity("3"), 3);
/// assert_eq!(coerce_quantity("2.9"), 2);
/// assert_eq!(coerce_quantity(""), 0);
/// assert_eq!(coerce_quantity("abc"), 0);
/// ```
#[must_use]
pub fn coerce_quantity(raw: &str) -> u32 {
    let raw = raw.trim();
    let whole = raw.split_once('.').map_or(raw, |(whole, _)| whole);
    if whole.starts_with('+') {
        return 0;
    }
    whole.parse().unwrap_or(0)
}

/// Prices orders against an immutable catalog and tax table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PricingEngine {
    catalog: Catalog,
    tax_table: TaxTable,
}

impl PricingEngine {
    /// Create an engine from its two lookup tables.
    #[must_use]
    pub const fn new(catalog: Catalog, tax_table: TaxTable) -> Self {
        Self { catalog, tax_table }
    }

    /// The catalog used for unit prices.
    #[must_use]
    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The tax table used for region rates.
    #[must_use]
    pub const fn tax_table(&self) -> &TaxTable {
        &self.tax_table
    }

    /// Price a submission.
    ///
    /// `raw_quantities` is indexed like [`Product::ALL`]. Each value goes
    /// through [`coerce_quantity`].
    ///
    /// # Errors
    ///
    /// - [`PricingError::NoProductSelected`] if every quantity is zero. This is
    ///   checked before the region, so an empty order never reports a region
    ///   problem.
    /// - [`PricingError::UnknownRegion`] if `region` is not in the tax table.
    pub fn price(
        &self,
        raw_quantities: [&str; Product::COUNT],
        region: &str,
    ) -> Result<PricedOrder, PricingError> {
        let lines: Vec<OrderLine> = Product::ALL
            .into_iter()
            .zip(raw_quantities)
            .map(|(product, raw)| {
                let quantity = coerce_quantity(raw);
                let unit_price = self.catalog.unit_price(product);
                OrderLine {
                    product,
                    quantity,
                    unit_price,
                    line_total: unit_price * quantity,
                }
            })
            .collect();

        if lines.iter().all(|line| line.quantity == 0) {
            return Err(PricingError::NoProductSelected);
        }

        let tax_rate = self
            .tax_table
            .rate(region)
            .ok_or_else(|| PricingError::UnknownRegion(region.to_owned()))?;

        let total: Price = lines.iter().map(|line| line.line_total).sum();
        let tax = total.percent(tax_rate);

        Ok(PricedOrder {
            lines,
            total,
            tax_rate,
            tax,
            overall_total: total + tax,
        })
    }
}
