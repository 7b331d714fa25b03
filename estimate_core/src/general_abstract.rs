//! # General Abstract
//!
//! Top-level rollup: one subtotal entry per part (in part creation order
//! unless explicitly resequenced) plus two fixed-percentage surcharges
//! compounding sequentially into the grand total:
//!
//! ```text
//! subtotal    = Σ part subtotals
//! electrified = round2(subtotal × (1 + electrification%))
//! grand_total = round2(electrified × (1 + prorata%))
//! ```
//!
//! Electrification applies first, prorata applies to the
//! post-electrification amount. The surcharges are never summed
//! independently; the staged order is fixed for numeric reproducibility.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};
use crate::money::{round_currency, Percent};

/// One part's contribution to the general abstract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartTotal {
    /// Part name
    pub name: String,

    /// The part's current subtotal
    pub subtotal: Decimal,
}

/// The project-level rollup sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralAbstract {
    /// Per-part subtotals, ordered
    pub part_totals: Vec<PartTotal>,

    /// Electrification surcharge, applied first (default 7%)
    pub electrification_percent: Percent,

    /// Contingency/prorata surcharge, applied to the post-electrification
    /// amount (default 13%)
    pub prorata_percent: Percent,

    /// Derived: sum of part subtotals
    pub subtotal: Decimal,

    /// Derived: subtotal after the electrification surcharge
    pub electrified_total: Decimal,

    /// Derived: final project total after both surcharges
    pub grand_total: Decimal,
}

fn default_percent(value: u32) -> Percent {
    // Literal percentages are non-negative; construction cannot fail.
    Percent::new(Decimal::from(value)).unwrap()
}

impl Default for GeneralAbstract {
    fn default() -> Self {
        GeneralAbstract {
            part_totals: Vec::new(),
            electrification_percent: default_percent(7),
            prorata_percent: default_percent(13),
            subtotal: Decimal::ZERO,
            electrified_total: Decimal::ZERO,
            grand_total: Decimal::ZERO,
        }
    }
}

impl GeneralAbstract {
    /// Create an empty general abstract with the default surcharges.
    pub fn new() -> Self {
        GeneralAbstract::default()
    }

    /// Register a new part at the end of the ordering with a zero
    /// subtotal.
    pub fn register_part(&mut self, name: impl Into<String>) {
        self.part_totals.push(PartTotal {
            name: name.into(),
            subtotal: Decimal::ZERO,
        });
        self.recompute();
    }

    /// Remove a part's entry, returning the subtotal that was dropped.
    pub fn remove_part(&mut self, name: &str) -> EstimateResult<Decimal> {
        let index = self
            .part_totals
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| EstimateError::not_found("Part", name))?;
        let removed = self.part_totals.remove(index);
        self.recompute();
        Ok(removed.subtotal)
    }

    /// Update a part's subtotal and re-derive the totals.
    pub fn set_part_subtotal(&mut self, name: &str, subtotal: Decimal) -> EstimateResult<()> {
        let entry = self
            .part_totals
            .iter_mut()
            .find(|p| p.name == name)
            .ok_or_else(|| EstimateError::not_found("Part", name))?;
        entry.subtotal = subtotal;
        self.recompute();
        Ok(())
    }

    /// Explicitly resequence a part within the ordering.
    pub fn move_part(&mut self, name: &str, new_index: usize) -> EstimateResult<()> {
        let index = self
            .part_totals
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| EstimateError::not_found("Part", name))?;
        if new_index >= self.part_totals.len() {
            return Err(EstimateError::validation(
                "new_index",
                new_index.to_string(),
                format!("must be less than {}", self.part_totals.len()),
            ));
        }
        let entry = self.part_totals.remove(index);
        self.part_totals.insert(new_index, entry);
        Ok(())
    }

    /// Replace the surcharge percentages and re-derive the totals.
    pub fn set_surcharges(&mut self, electrification: Percent, prorata: Percent) {
        self.electrification_percent = electrification;
        self.prorata_percent = prorata;
        self.recompute();
    }

    /// Re-derive subtotal, electrified total and grand total from the
    /// current part entries. Idempotent.
    pub fn recompute(&mut self) {
        self.subtotal = round_currency(self.part_totals.iter().map(|p| p.subtotal).sum());
        self.electrified_total = self.electrification_percent.apply(self.subtotal);
        self.grand_total = self.prorata_percent.apply(self.electrified_total);
    }

    /// Part names in their current order.
    pub fn part_order(&self) -> Vec<&str> {
        self.part_totals.iter().map(|p| p.name.as_str()).collect()
    }
}
