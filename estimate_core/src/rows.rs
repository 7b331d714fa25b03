//! # Row-Oriented Boundary
//!
//! Plain field-name → value maps for the import/export collaborator. The
//! core owns no file format: an importer parses xlsx/csv/forms into these
//! maps, and an exporter serializes them back out however it likes.
//!
//! Decimals serialize as JSON strings (rust_decimal's default), so values
//! survive any tabular format without float drift.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::measurement::MeasurementFields;
//! use estimate_core::rows::{self, Row};
//! use rust_decimal::Decimal;
//!
//! let mut row = Row::new();
//! row.insert("label".into(), "Brickwork".into());
//! row.insert("multiplier".into(), "2".into());
//! row.insert("length".into(), "10".into());
//!
//! let fields = MeasurementFields::from_row(&row).unwrap();
//! assert_eq!(fields.total(), Decimal::from(20));
//! ```

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::abstracts::{AbstractFields, AbstractLedger};
use crate::errors::{EstimateError, EstimateResult};
use crate::general_abstract::GeneralAbstract;
use crate::measurement::{MeasurementFields, MeasurementLedger};

/// One row: field name → JSON value.
pub type Row = serde_json::Map<String, Value>;

/// Serialize any line or snapshot struct into a row map.
pub fn to_row<T: Serialize>(value: &T) -> EstimateResult<Row> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(EstimateError::SerializationError {
            reason: format!("expected an object row, got {}", other),
        }),
        Err(e) => Err(EstimateError::SerializationError {
            reason: e.to_string(),
        }),
    }
}

/// Export a measurement ledger as rows, in display order.
pub fn measurement_rows(ledger: &MeasurementLedger) -> EstimateResult<Vec<Row>> {
    ledger.iter().map(to_row).collect()
}

/// Export an abstract ledger as rows, in display order.
pub fn abstract_rows(ledger: &AbstractLedger) -> EstimateResult<Vec<Row>> {
    ledger.iter().map(to_row).collect()
}

/// Export the general abstract as rows: one per part, then the summary
/// lines in sheet order (subtotal, both surcharge stages, grand total).
pub fn general_abstract_rows(general: &GeneralAbstract) -> EstimateResult<Vec<Row>> {
    let mut rows: Vec<Row> = general
        .part_totals
        .iter()
        .map(to_row)
        .collect::<EstimateResult<_>>()?;

    let mut summary = |label: &str, amount: Decimal| {
        let mut row = Row::new();
        row.insert("name".to_string(), Value::String(label.to_string()));
        row.insert("subtotal".to_string(), Value::String(amount.to_string()));
        rows.push(row);
    };
    summary("Subtotal", general.subtotal);
    summary(
        &format!("Electrification @ {}%", general.electrification_percent.value()),
        general.electrified_total,
    );
    summary(
        &format!("Contingency/prorata @ {}%", general.prorata_percent.value()),
        general.grand_total,
    );
    summary("Grand Total", general.grand_total);
    Ok(rows)
}

fn text_field(row: &Row, field: &str) -> EstimateResult<String> {
    match row.get(field) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(EstimateError::validation(
            field,
            other.to_string(),
            "expected text",
        )),
    }
}

fn decimal_field(row: &Row, field: &str, default: Decimal) -> EstimateResult<Decimal> {
    let value = match row.get(field) {
        None | Some(Value::Null) => return Ok(default),
        Some(v) => v,
    };
    let text = match value {
        Value::String(s) if s.trim().is_empty() => return Ok(default),
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        other => {
            return Err(EstimateError::validation(
                field,
                other.to_string(),
                "expected a number",
            ))
        }
    };
    text.parse::<Decimal>().map_err(|_| {
        EstimateError::validation(field, text.clone(), "not a valid number")
    })
}

impl MeasurementFields {
    /// Build measurement fields from a row map.
    ///
    /// Missing dimensions default to 1 (the multiplicative identity);
    /// non-numeric values fail with `Validation` naming the field.
    pub fn from_row(row: &Row) -> EstimateResult<Self> {
        let rate_code = {
            let code = text_field(row, "rate_code")?;
            if code.is_empty() { None } else { Some(code) }
        };
        Ok(MeasurementFields {
            rate_code,
            label: text_field(row, "label")?,
            multiplier: decimal_field(row, "multiplier", Decimal::ONE)?,
            length: decimal_field(row, "length", Decimal::ONE)?,
            breadth: decimal_field(row, "breadth", Decimal::ONE)?,
            height: decimal_field(row, "height", Decimal::ONE)?,
            unit: text_field(row, "unit")?,
        })
    }
}

impl AbstractFields {
    /// Build abstract fields from a row map.
    ///
    /// Missing quantity/rate default to zero; non-numeric values fail with
    /// `Validation` naming the field.
    pub fn from_row(row: &Row) -> EstimateResult<Self> {
        let rate_code = {
            let code = text_field(row, "rate_code")?;
            if code.is_empty() { None } else { Some(code) }
        };
        Ok(AbstractFields {
            rate_code,
            description: text_field(row, "description")?,
            unit: text_field(row, "unit")?,
            quantity: decimal_field(row, "quantity", Decimal::ZERO)?,
            rate: decimal_field(row, "rate", Decimal::ZERO)?,
        })
    }
}
