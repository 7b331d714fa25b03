//! # Measurement Ledger
//!
//! Per-part ordered collection of measurement lines. Each line records the
//! dimensions of an item of work and derives its quantity from them:
//!
//! ```text
//! total = multiplier × length × breadth × height
//! ```
//!
//! Non-volumetric items (counts, linear runs, areas) leave the unused
//! dimensions at the multiplicative identity 1, so the one formula covers
//! every unit of measurement.
//!
//! Lines are owned exclusively by their part's ledger. Abstract lines may
//! hold a non-owning reference to a measurement line; keeping that
//! reference in sync is the [`Estimate`](crate::estimate::Estimate)
//! aggregate's job, not the ledger's.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::money::require_non_negative;

/// Editable fields of a measurement line.
///
/// Input shape for `add_line`/`update_line`, typically produced by the
/// form or import collaborator. Dimensions default to 1 so a count item
/// can be entered as just a multiplier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementFields {
    /// Optional SSR code this measurement refers to
    pub rate_code: Option<String>,

    /// Item description shown on the measurement sheet
    pub label: String,

    /// Number of identical items (the "nos" column)
    pub multiplier: Decimal,

    /// Length dimension
    pub length: Decimal,

    /// Breadth dimension
    pub breadth: Decimal,

    /// Height/depth dimension
    pub height: Decimal,

    /// Unit of measurement (e.g., "cum", "sqm", "each")
    pub unit: String,
}

impl Default for MeasurementFields {
    fn default() -> Self {
        MeasurementFields {
            rate_code: None,
            label: String::new(),
            multiplier: Decimal::ONE,
            length: Decimal::ONE,
            breadth: Decimal::ONE,
            height: Decimal::ONE,
            unit: String::new(),
        }
    }
}

impl MeasurementFields {
    /// Validate all numeric fields before any state is mutated.
    pub fn validate(&self) -> EstimateResult<()> {
        require_non_negative("multiplier", self.multiplier)?;
        require_non_negative("length", self.length)?;
        require_non_negative("breadth", self.breadth)?;
        require_non_negative("height", self.height)?;
        Ok(())
    }

    /// The derived quantity for these dimensions.
    pub fn total(&self) -> Decimal {
        self.multiplier * self.length * self.breadth * self.height
    }
}

/// One row of the measurement sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementLine {
    /// Unique line id (collision-free, stable across reorders)
    pub id: Uuid,

    /// Optional SSR code this measurement refers to
    pub rate_code: Option<String>,

    /// Item description
    pub label: String,

    /// Number of identical items
    pub multiplier: Decimal,

    /// Length dimension
    pub length: Decimal,

    /// Breadth dimension
    pub breadth: Decimal,

    /// Height/depth dimension
    pub height: Decimal,

    /// Unit of measurement
    pub unit: String,

    /// Derived quantity: multiplier × length × breadth × height
    pub total: Decimal,
}

impl MeasurementLine {
    fn from_fields(id: Uuid, fields: MeasurementFields) -> Self {
        let total = fields.total();
        MeasurementLine {
            id,
            rate_code: fields.rate_code,
            label: fields.label,
            multiplier: fields.multiplier,
            length: fields.length,
            breadth: fields.breadth,
            height: fields.height,
            unit: fields.unit,
            total,
        }
    }

    /// Recompute `total` from the current dimension fields.
    pub fn recompute(&mut self) {
        self.total = self.multiplier * self.length * self.breadth * self.height;
    }
}

/// Ordered collection of measurement lines for one part.
///
/// Insertion order is the canonical display/export order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementLedger {
    lines: Vec<MeasurementLine>,
}

impl MeasurementLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        MeasurementLedger { lines: Vec::new() }
    }

    /// Add a line, returning its assigned id.
    ///
    /// Fails with `Validation` if any numeric field is negative; on
    /// failure nothing is appended.
    pub fn add_line(&mut self, fields: MeasurementFields) -> EstimateResult<Uuid> {
        fields.validate()?;
        let id = Uuid::new_v4();
        self.lines.push(MeasurementLine::from_fields(id, fields));
        Ok(id)
    }

    /// Replace a line's editable fields and recompute its total.
    ///
    /// Propagation to any linked abstract line happens at the estimate
    /// level before the mutating call returns to the caller.
    pub fn update_line(&mut self, id: Uuid, fields: MeasurementFields) -> EstimateResult<()> {
        fields.validate()?;
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| EstimateError::not_found("Measurement line", id.to_string()))?;
        *line = MeasurementLine::from_fields(id, fields);
        Ok(())
    }

    /// Remove a line, returning it.
    pub fn remove_line(&mut self, id: Uuid) -> EstimateResult<MeasurementLine> {
        let index = self
            .lines
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| EstimateError::not_found("Measurement line", id.to_string()))?;
        Ok(self.lines.remove(index))
    }

    /// Recompute every line's total from its current field values.
    ///
    /// Deterministic and idempotent; used after bulk import.
    pub fn recompute_all(&mut self) {
        for line in &mut self.lines {
            line.recompute();
        }
    }

    /// Get a line by id.
    pub fn get(&self, id: Uuid) -> Option<&MeasurementLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Iterate lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &MeasurementLine> {
        self.lines.iter()
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// True if the ledger has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
