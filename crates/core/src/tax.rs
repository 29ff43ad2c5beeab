//! Regional sales tax rates.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

/// A region the shop ships to, with its display label and tax rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Key submitted by the order form (e.g. `"BritishColumbia"`).
    pub key: String,
    /// Name shown to customers (e.g. `"British Columbia"`).
    pub label: String,
    /// Tax rate as a percentage (13 means 13%).
    pub rate: Decimal,
}

/// Canadian provinces and territories: key, label, rate mantissa, rate scale.
const CANADIAN_RATES: &[(&str, &str, i64, u32)] = &[
    ("Alberta", "Alberta", 5, 0),
    ("BritishColumbia", "British Columbia", 12, 0),
    ("Manitoba", "Manitoba", 12, 0),
    ("NewBrunswick", "New Brunswick", 15, 0),
    ("NewFoundLand", "Newfoundland and Labrador", 15, 0),
    ("NorthWestTerritories", "Northwest Territories", 5, 0),
    ("NovaScotia", "Nova Scotia", 15, 0),
    ("Nunavut", "Nunavut", 5, 0),
    ("Ontario", "Ontario", 13, 0),
    ("PrinceEdwardIsland", "Prince Edward Island", 15, 0),
    ("Quebec", "Quebec", 14_975, 3),
    ("Saskatchewan", "Saskatchewan", 11, 0),
    ("Yukon", "Yukon", 5, 0),
];

/// Immutable mapping from region key to tax rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxTable {
    regions: BTreeMap<String, Region>,
}

impl TaxTable {
    /// The shop's Canadian tax table.
    #[must_use]
    pub fn canadian() -> Self {
        Self::from_regions(CANADIAN_RATES.iter().map(|&(key, label, mantissa, scale)| Region {
            key: key.to_owned(),
            label: label.to_owned(),
            rate: Decimal::new(mantissa, scale),
        }))
    }

    /// Build a table from arbitrary regions. Later duplicates win.
    pub fn from_regions(regions: impl IntoIterator<Item = Region>) -> Self {
        Self {
            regions: regions
                .into_iter()
                .map(|region| (region.key.clone(), region))
                .collect(),
        }
    }

    /// Tax rate for a region key, or `None` if the region is not registered.
    ///
    /// Keys match exactly after trimming surrounding whitespace.
    #[must_use]
    pub fn rate(&self, region: &str) -> Option<Decimal> {
        self.get(region).map(|r| r.rate)
    }

    /// Look up a region by key.
    #[must_use]
    pub fn get(&self, region: &str) -> Option<&Region> {
        self.regions.get(region.trim())
    }

    /// Iterate over regions ordered by key.
    pub fn regions(&self) -> impl Iterator<Item = &Region> {
        self.regions.values()
    }

    /// Number of registered regions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Returns `true` if no regions are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

impl Default for TaxTable {
    fn default() -> Self {
        Self::canadian()
    }
}
