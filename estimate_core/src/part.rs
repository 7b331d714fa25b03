//! # Parts
//!
//! A part is a user-defined subdivision of the project (typically a floor
//! or a block) owning one measurement ledger and one abstract-of-cost
//! ledger. Part names become sheet/file names downstream, so they are
//! validated against a path-breaking character set.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::abstracts::AbstractLedger;
use crate::errors::{EstimateError, EstimateResult};
use crate::measurement::MeasurementLedger;

/// Characters that would break sheet or file names downstream.
pub const FORBIDDEN_NAME_CHARS: &[char] =
    &['\\', '/', ':', '*', '?', '"', '<', '>', '|', '[', ']'];

/// Maximum part name length.
pub const MAX_NAME_LEN: usize = 50;

/// Validate a part name: non-empty after trimming, at most
/// [`MAX_NAME_LEN`] characters, none of [`FORBIDDEN_NAME_CHARS`].
///
/// Uniqueness against existing parts is the estimate's concern, not the
/// name's.
pub fn validate_part_name(name: &str) -> EstimateResult<()> {
    if name.trim().is_empty() {
        return Err(EstimateError::validation(
            "name",
            name,
            "part name must be non-empty",
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(EstimateError::validation(
            "name",
            name,
            format!("part name must be at most {} characters", MAX_NAME_LEN),
        ));
    }
    if let Some(bad) = name.chars().find(|c| FORBIDDEN_NAME_CHARS.contains(c)) {
        return Err(EstimateError::validation(
            "name",
            name,
            format!("part name must not contain '{}'", bad),
        ));
    }
    Ok(())
}

/// One named subdivision of the estimate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Unique (case-insensitively) validated name
    pub name: String,

    /// The part's measurement sheet
    pub measurements: MeasurementLedger,

    /// The part's abstract of cost
    pub abstracts: AbstractLedger,

    /// Derived: sum of abstract line amounts
    pub subtotal: Decimal,
}

impl Part {
    /// Create an empty part with a validated name.
    pub fn new(name: impl Into<String>) -> EstimateResult<Self> {
        let name = name.into();
        validate_part_name(&name)?;
        Ok(Part {
            name,
            measurements: MeasurementLedger::new(),
            abstracts: AbstractLedger::new(),
            subtotal: Decimal::ZERO,
        })
    }

    /// Recompute the subtotal from the abstract ledger.
    pub fn recompute_subtotal(&mut self) {
        self.subtotal = self.abstracts.subtotal();
    }
}
