//! # Standard Schedule of Rates (SSR)
//!
//! Lookup table from rate codes to (description, unit, rate). Entries are
//! created or replaced by rate-table import (`upsert`) and never removed
//! automatically while measurement or abstract lines reference them.
//!
//! A small bundled schedule is available via [`RateTable::standard`] for
//! demos and tests; real deployments import their own SSR through the
//! boundary layer.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::rates::{RateEntry, RateTable};
//! use rust_decimal::Decimal;
//!
//! let mut table = RateTable::new();
//! table.upsert(RateEntry::new("13.1.1", "Brick masonry in CM 1:6", "cum", Decimal::from(4850))).unwrap();
//!
//! let entry = table.lookup("13.1.1").unwrap();
//! assert_eq!(entry.unit, "cum");
//! ```

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::money::require_non_negative;

/// A single standard rate: what one unit of an item of work costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateEntry {
    /// SSR item code, unique within the table (e.g., "13.1.1")
    pub code: String,

    /// Description of the item of work
    pub description: String,

    /// Unit of measurement (e.g., "cum", "sqm", "rmt", "each")
    pub unit: String,

    /// Rate per unit, non-negative
    pub rate: Decimal,

    /// Optional chapter/category (e.g., "Masonry")
    pub category: Option<String>,
}

impl RateEntry {
    /// Create a rate entry without a category.
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        RateEntry {
            code: code.into(),
            description: description.into(),
            unit: unit.into(),
            rate,
            category: None,
        }
    }

    /// Builder-style category setter.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// The rate lookup table, keyed by code.
///
/// Backed by a `BTreeMap` so iteration and search results come out in
/// ascending code order, deterministic across repeated calls.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    entries: BTreeMap<String, RateEntry>,
}

impl RateTable {
    /// Create an empty rate table.
    pub fn new() -> Self {
        RateTable {
            entries: BTreeMap::new(),
        }
    }

    /// A copy of the bundled sample schedule of rates.
    pub fn standard() -> Self {
        STANDARD_TABLE.clone()
    }

    /// Look up an entry by code.
    pub fn lookup(&self, code: &str) -> EstimateResult<&RateEntry> {
        self.entries
            .get(code)
            .ok_or_else(|| EstimateError::not_found("Rate code", code))
    }

    /// Look up an entry by code, returning `None` on a miss.
    pub fn get(&self, code: &str) -> Option<&RateEntry> {
        self.entries.get(code)
    }

    /// Insert or replace an entry by code. Idempotent: upserting the same
    /// entry twice leaves one copy.
    pub fn upsert(&mut self, entry: RateEntry) -> EstimateResult<()> {
        if entry.code.trim().is_empty() {
            return Err(EstimateError::validation(
                "code",
                entry.code,
                "rate code must be non-empty",
            ));
        }
        require_non_negative("rate", entry.rate)?;
        self.entries.insert(entry.code.clone(), entry);
        Ok(())
    }

    /// Case-insensitive substring search over code, description and
    /// category. Results are in ascending code order.
    pub fn search(&self, text: &str) -> Vec<&RateEntry> {
        let needle = text.to_lowercase();
        self.entries
            .values()
            .filter(|e| {
                e.code.to_lowercase().contains(&needle)
                    || e.description.to_lowercase().contains(&needle)
                    || e.category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Iterate all entries in code order.
    pub fn iter(&self) -> impl Iterator<Item = &RateEntry> {
        self.entries.values()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Bundled sample rates: (code, description, unit, rate, category).
///
/// Rates are indicative CPWD-style figures, intended for demos and tests.
const STANDARD_RATES: &[(&str, &str, &str, &str, &str)] = &[
    ("2.5.1", "Earthwork in excavation in foundation trenches", "cum", "285.00", "Earthwork"),
    ("2.25", "Filling available excavated earth in trenches", "cum", "198.50", "Earthwork"),
    ("4.1.3", "Plain cement concrete 1:2:4 in foundation", "cum", "6240.00", "Concrete"),
    ("5.9.1", "Reinforced cement concrete M20 in slabs", "cum", "7890.00", "Concrete"),
    ("5.22.6", "Steel reinforcement, thermo-mechanically treated bars", "kg", "72.40", "Concrete"),
    ("13.1.1", "Brick masonry in cement mortar 1:6 in superstructure", "cum", "4850.00", "Masonry"),
    ("13.4.2", "Half brick masonry in partitions", "sqm", "920.00", "Masonry"),
    ("11.3.1", "Cement plaster 12 mm thick 1:6", "sqm", "218.00", "Finishing"),
    ("11.41.1", "Ceramic glazed floor tiles", "sqm", "1040.00", "Finishing"),
    ("9.48.2", "Flush door shutters, 35 mm, commercial ply", "sqm", "2310.00", "Woodwork"),
    ("10.25.1", "Steel windows with glazing", "sqm", "3180.00", "Steelwork"),
    ("14.54.1", "Painting two coats with synthetic enamel", "sqm", "112.50", "Finishing"),
];

static STANDARD_TABLE: Lazy<RateTable> = Lazy::new(|| {
    let mut table = RateTable::new();
    for (code, description, unit, rate, category) in STANDARD_RATES {
        let rate: Decimal = rate.parse().unwrap_or(Decimal::ZERO);
        let entry = RateEntry::new(*code, *description, *unit, rate).with_category(*category);
        // Bundled data is well-formed; an upsert failure here is a bug.
        table.upsert(entry).unwrap();
    }
    table
});
