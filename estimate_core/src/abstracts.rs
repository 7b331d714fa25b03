//! # Abstract of Cost Ledger
//!
//! Per-part ordered collection of abstract-of-cost lines. Each line prices
//! a quantity against a rate: `amount = quantity × rate`.
//!
//! A line may hold a non-owning link to a measurement line in the sibling
//! measurement ledger; a linked line's quantity is *derived* — it mirrors
//! the measurement total and direct edits to it are rejected with
//! `InvalidOperation`. The link is a foreign-key-style reference: deleting
//! the measurement line nulls the link, it never deletes the abstract line
//! and never dangles.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{EstimateError, EstimateResult};
use crate::measurement::MeasurementLedger;
use crate::money::{require_non_negative, round_currency};
use crate::rates::RateTable;

/// Editable fields of an abstract line.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbstractFields {
    /// Optional SSR code; when set on `add_line`, blank description/unit
    /// and a zero rate are defaulted from the rate table
    pub rate_code: Option<String>,

    /// Item description
    pub description: String,

    /// Unit of measurement
    pub unit: String,

    /// Quantity (ignored in favor of the measurement total when the line
    /// is linked)
    pub quantity: Decimal,

    /// Rate per unit
    pub rate: Decimal,
}

impl AbstractFields {
    fn validate(&self) -> EstimateResult<()> {
        require_non_negative("quantity", self.quantity)?;
        require_non_negative("rate", self.rate)?;
        Ok(())
    }
}

/// One row of the abstract of cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbstractLine {
    /// Unique line id
    pub id: Uuid,

    /// Optional SSR code
    pub rate_code: Option<String>,

    /// Item description
    pub description: String,

    /// Unit of measurement
    pub unit: String,

    /// Quantity; derived from the linked measurement total when
    /// `linked_measurement` is set
    pub quantity: Decimal,

    /// Rate per unit
    pub rate: Decimal,

    /// Derived: round2(quantity × rate)
    pub amount: Decimal,

    /// Non-owning reference into the sibling measurement ledger
    pub linked_measurement: Option<Uuid>,
}

impl AbstractLine {
    /// True if this line's quantity mirrors a measurement total.
    pub fn is_linked(&self) -> bool {
        self.linked_measurement.is_some()
    }

    /// Recompute `amount` from the current quantity and rate.
    pub fn recompute(&mut self) {
        self.amount = round_currency(self.quantity * self.rate);
    }
}

/// Ordered collection of abstract lines for one part.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AbstractLedger {
    lines: Vec<AbstractLine>,
}

impl AbstractLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        AbstractLedger { lines: Vec::new() }
    }

    /// Add a line, returning its assigned id.
    ///
    /// With a `rate_code`, a blank description/unit and a zero rate are
    /// filled from the rate table (caller-supplied values win). With
    /// `linked`, the quantity is seeded from that measurement line's
    /// current total and the line is marked derived.
    pub fn add_line(
        &mut self,
        fields: AbstractFields,
        linked: Option<Uuid>,
        rates: &RateTable,
        measurements: &MeasurementLedger,
    ) -> EstimateResult<Uuid> {
        fields.validate()?;

        let mut fields = fields;
        if let Some(code) = &fields.rate_code {
            let entry = rates.lookup(code)?;
            if fields.description.is_empty() {
                fields.description = entry.description.clone();
            }
            if fields.unit.is_empty() {
                fields.unit = entry.unit.clone();
            }
            if fields.rate == Decimal::ZERO {
                fields.rate = entry.rate;
            }
        }

        let quantity = match linked {
            Some(measurement_id) => {
                measurements
                    .get(measurement_id)
                    .ok_or_else(|| {
                        EstimateError::not_found("Measurement line", measurement_id.to_string())
                    })?
                    .total
            }
            None => fields.quantity,
        };

        let id = Uuid::new_v4();
        let mut line = AbstractLine {
            id,
            rate_code: fields.rate_code,
            description: fields.description,
            unit: fields.unit,
            quantity,
            rate: fields.rate,
            amount: Decimal::ZERO,
            linked_measurement: linked,
        };
        line.recompute();
        self.lines.push(line);
        Ok(id)
    }

    /// Replace a line's editable fields and recompute its amount.
    ///
    /// On a linked line the quantity is derived; passing a quantity that
    /// differs from the mirrored measurement total fails with
    /// `InvalidOperation` and leaves the line unchanged.
    pub fn update_line(&mut self, id: Uuid, fields: AbstractFields) -> EstimateResult<()> {
        fields.validate()?;
        let line = self
            .lines
            .iter_mut()
            .find(|l| l.id == id)
            .ok_or_else(|| EstimateError::not_found("Abstract line", id.to_string()))?;

        if line.is_linked() && fields.quantity != line.quantity {
            return Err(EstimateError::invalid_operation(
                "quantity is derived from the linked measurement line; edit the measurement instead",
            ));
        }

        line.rate_code = fields.rate_code;
        line.description = fields.description;
        line.unit = fields.unit;
        if !line.is_linked() {
            line.quantity = fields.quantity;
        }
        line.rate = fields.rate;
        line.recompute();
        Ok(())
    }

    /// Remove a line, returning it. The linked measurement line, if any,
    /// is untouched: ownership is one-directional.
    pub fn remove_line(&mut self, id: Uuid) -> EstimateResult<AbstractLine> {
        let index = self
            .lines
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| EstimateError::not_found("Abstract line", id.to_string()))?;
        Ok(self.lines.remove(index))
    }

    /// Null every link pointing at the given measurement line.
    ///
    /// Called when a measurement line is deleted; the abstract lines keep
    /// their last derived quantity and become manual.
    pub fn clear_links_to(&mut self, measurement_id: Uuid) {
        for line in &mut self.lines {
            if line.linked_measurement == Some(measurement_id) {
                line.linked_measurement = None;
            }
        }
    }

    /// Mirror every linked line's quantity from the measurement ledger and
    /// recompute its amount. Links whose target no longer exists are
    /// nulled rather than left dangling.
    pub fn sync_from_measurements(&mut self, measurements: &MeasurementLedger) {
        for line in &mut self.lines {
            if let Some(measurement_id) = line.linked_measurement {
                match measurements.get(measurement_id) {
                    Some(m) => {
                        line.quantity = m.total;
                        line.recompute();
                    }
                    None => line.linked_measurement = None,
                }
            }
        }
    }

    /// Create one linked abstract line for every measurement line that
    /// does not already have one. Matching is by `linked_measurement` id,
    /// never by description text, so re-running is idempotent.
    ///
    /// Rate resolution order: rate table by the measurement's rate code,
    /// then the caller's default-rate-by-unit map, then zero.
    ///
    /// Returns the number of lines created.
    pub fn auto_generate_from_measurements(
        &mut self,
        measurements: &MeasurementLedger,
        rates: &RateTable,
        default_rates_by_unit: &HashMap<String, Decimal>,
    ) -> usize {
        let already_linked: HashSet<Uuid> =
            self.lines.iter().filter_map(|l| l.linked_measurement).collect();

        let mut created = 0;
        for m in measurements.iter() {
            if already_linked.contains(&m.id) {
                continue;
            }
            let rate = m
                .rate_code
                .as_deref()
                .and_then(|code| rates.get(code))
                .map(|entry| entry.rate)
                .or_else(|| default_rates_by_unit.get(&m.unit).copied())
                .unwrap_or(Decimal::ZERO);

            let mut line = AbstractLine {
                id: Uuid::new_v4(),
                rate_code: m.rate_code.clone(),
                description: m.label.clone(),
                unit: m.unit.clone(),
                quantity: m.total,
                rate,
                amount: Decimal::ZERO,
                linked_measurement: Some(m.id),
            };
            line.recompute();
            self.lines.push(line);
            created += 1;
        }
        created
    }

    /// Sum of all line amounts, rounded to currency scale.
    pub fn subtotal(&self) -> Decimal {
        round_currency(self.lines.iter().map(|l| l.amount).sum())
    }

    /// Get a line by id.
    pub fn get(&self, id: Uuid) -> Option<&AbstractLine> {
        self.lines.iter().find(|l| l.id == id)
    }

    /// Iterate lines in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &AbstractLine> {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::measurement::MeasurementFields;
    use crate::rates::RateEntry;

    fn brickwork_measurement(ledger: &mut MeasurementLedger) -> Uuid {
        ledger
            .add_line(MeasurementFields {
                rate_code: Some("13.1.1".to_string()),
                label: "Brickwork in superstructure".to_string(),
                multiplier: Decimal::from(2),
                length: Decimal::from(10),
                breadth: Decimal::from(5),
                height: Decimal::from(3),
                unit: "cum".to_string(),
            })
            .unwrap()
    }

    #[test]
    fn test_amount_is_quantity_times_rate() {
        let rates = RateTable::standard();
        let measurements = MeasurementLedger::new();
        let mut abstracts = AbstractLedger::new();

        let id = abstracts
            .add_line(
                AbstractFields {
                    description: "PCC bed".to_string(),
                    unit: "cum".to_string(),
                    quantity: Decimal::from(12),
                    rate: Decimal::from(6240),
                    ..Default::default()
                },
                None,
                &rates,
                &measurements,
            )
            .unwrap();

        assert_eq!(abstracts.get(id).unwrap().amount, Decimal::from(74_880));
    }

    #[test]
    fn test_rate_code_defaults_are_overridable() {
        let rates = RateTable::standard();
        let measurements = MeasurementLedger::new();
        let mut abstracts = AbstractLedger::new();

        // Blank fields pick up table values
        let defaulted = abstracts
            .add_line(
                AbstractFields {
                    rate_code: Some("13.1.1".to_string()),
                    quantity: Decimal::from(10),
                    ..Default::default()
                },
                None,
                &rates,
                &measurements,
            )
            .unwrap();
        let line = abstracts.get(defaulted).unwrap();
        assert_eq!(line.unit, "cum");
        assert_eq!(line.rate, "4850.00".parse::<Decimal>().unwrap());

        // Caller-supplied rate wins over the table
        let overridden = abstracts
            .add_line(
                AbstractFields {
                    rate_code: Some("13.1.1".to_string()),
                    quantity: Decimal::from(10),
                    rate: Decimal::from(5000),
                    ..Default::default()
                },
                None,
                &rates,
                &measurements,
            )
            .unwrap();
        assert_eq!(abstracts.get(overridden).unwrap().rate, Decimal::from(5000));
    }

    #[test]
    fn test_unknown_rate_code_fails() {
        let rates = RateTable::standard();
        let measurements = MeasurementLedger::new();
        let mut abstracts = AbstractLedger::new();

        let err = abstracts
            .add_line(
                AbstractFields {
                    rate_code: Some("99.99".to_string()),
                    ..Default::default()
                },
                None,
                &rates,
                &measurements,
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(abstracts.is_empty());
    }

    #[test]
    fn test_linked_line_seeds_quantity_from_measurement() {
        let rates = RateTable::standard();
        let mut measurements = MeasurementLedger::new();
        let m_id = brickwork_measurement(&mut measurements);
        let mut abstracts = AbstractLedger::new();

        let id = abstracts
            .add_line(
                AbstractFields {
                    rate_code: Some("13.1.1".to_string()),
                    ..Default::default()
                },
                Some(m_id),
                &rates,
                &measurements,
            )
            .unwrap();

        let line = abstracts.get(id).unwrap();
        assert_eq!(line.quantity, Decimal::from(300));
        assert_eq!(line.amount, Decimal::from(1_455_000));
        assert!(line.is_linked());
    }

    #[test]
    fn test_editing_linked_quantity_is_rejected() {
        let rates = RateTable::standard();
        let mut measurements = MeasurementLedger::new();
        let m_id = brickwork_measurement(&mut measurements);
        let mut abstracts = AbstractLedger::new();

        let id = abstracts
            .add_line(
                AbstractFields {
                    rate_code: Some("13.1.1".to_string()),
                    ..Default::default()
                },
                Some(m_id),
                &rates,
                &measurements,
            )
            .unwrap();

        let before = abstracts.get(id).unwrap().clone();
        let err = abstracts
            .update_line(
                id,
                AbstractFields {
                    rate_code: before.rate_code.clone(),
                    description: before.description.clone(),
                    unit: before.unit.clone(),
                    quantity: Decimal::from(999),
                    rate: before.rate,
                },
            )
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_OPERATION");
        assert_eq!(abstracts.get(id).unwrap(), &before);
    }

    #[test]
    fn test_rate_edit_on_linked_line_recomputes_amount() {
        let rates = RateTable::standard();
        let mut measurements = MeasurementLedger::new();
        let m_id = brickwork_measurement(&mut measurements);
        let mut abstracts = AbstractLedger::new();

        let id = abstracts
            .add_line(
                AbstractFields {
                    rate_code: Some("13.1.1".to_string()),
                    ..Default::default()
                },
                Some(m_id),
                &rates,
                &measurements,
            )
            .unwrap();

        let current = abstracts.get(id).unwrap().clone();
        abstracts
            .update_line(
                id,
                AbstractFields {
                    rate_code: current.rate_code,
                    description: current.description,
                    unit: current.unit,
                    quantity: current.quantity,
                    rate: Decimal::from(5000),
                },
            )
            .unwrap();
        assert_eq!(abstracts.get(id).unwrap().amount, Decimal::from(1_500_000));
    }

    #[test]
    fn test_unlinked_quantity_edit_recomputes_amount() {
        let rates = RateTable::standard();
        let measurements = MeasurementLedger::new();
        let mut abstracts = AbstractLedger::new();

        let id = abstracts
            .add_line(
                AbstractFields {
                    description: "Plaster".to_string(),
                    unit: "sqm".to_string(),
                    quantity: Decimal::from(10),
                    rate: Decimal::from(218),
                    ..Default::default()
                },
                None,
                &rates,
                &measurements,
            )
            .unwrap();
        assert_eq!(abstracts.get(id).unwrap().amount, Decimal::from(2180));

        abstracts
            .update_line(
                id,
                AbstractFields {
                    description: "Plaster".to_string(),
                    unit: "sqm".to_string(),
                    quantity: Decimal::from(15),
                    rate: Decimal::from(218),
                    ..Default::default()
                },
            )
            .unwrap();

        let line = abstracts.get(id).unwrap();
        assert_eq!(line.quantity, Decimal::from(15));
        assert_eq!(line.amount, Decimal::from(3270));
    }

    #[test]
    fn test_clear_links_nulls_without_deleting() {
        let rates = RateTable::standard();
        let mut measurements = MeasurementLedger::new();
        let m_id = brickwork_measurement(&mut measurements);
        let mut abstracts = AbstractLedger::new();

        let id = abstracts
            .add_line(
                AbstractFields {
                    rate_code: Some("13.1.1".to_string()),
                    ..Default::default()
                },
                Some(m_id),
                &rates,
                &measurements,
            )
            .unwrap();

        abstracts.clear_links_to(m_id);
        let line = abstracts.get(id).unwrap();
        assert!(!line.is_linked());
        // Last derived quantity survives as a manual value
        assert_eq!(line.quantity, Decimal::from(300));
    }

    #[test]
    fn test_auto_generate_is_idempotent() {
        let rates = RateTable::standard();
        let mut measurements = MeasurementLedger::new();
        brickwork_measurement(&mut measurements);
        measurements
            .add_line(MeasurementFields {
                label: "Plaster".to_string(),
                multiplier: Decimal::from(4),
                length: Decimal::from(10),
                breadth: Decimal::from(3),
                unit: "sqm".to_string(),
                ..Default::default()
            })
            .unwrap();

        let mut defaults = HashMap::new();
        defaults.insert("sqm".to_string(), Decimal::from(218));

        let mut abstracts = AbstractLedger::new();
        let created = abstracts.auto_generate_from_measurements(&measurements, &rates, &defaults);
        assert_eq!(created, 2);

        let rerun = abstracts.auto_generate_from_measurements(&measurements, &rates, &defaults);
        assert_eq!(rerun, 0);
        assert_eq!(abstracts.len(), 2);
    }

    #[test]
    fn test_auto_generate_rate_resolution() {
        let mut rates = RateTable::new();
        rates
            .upsert(RateEntry::new("13.1.1", "Brickwork", "cum", Decimal::from(4850)))
            .unwrap();

        let mut measurements = MeasurementLedger::new();
        brickwork_measurement(&mut measurements); // has rate code
        measurements
            .add_line(MeasurementFields {
                label: "Plaster".to_string(),
                multiplier: Decimal::from(120),
                unit: "sqm".to_string(),
                ..Default::default()
            })
            .unwrap(); // no code, falls back to unit default
        measurements
            .add_line(MeasurementFields {
                label: "Odd item".to_string(),
                multiplier: Decimal::from(1),
                unit: "quintal".to_string(),
                ..Default::default()
            })
            .unwrap(); // no code, no default: zero rate

        let mut defaults = HashMap::new();
        defaults.insert("sqm".to_string(), Decimal::from(218));

        let mut abstracts = AbstractLedger::new();
        abstracts.auto_generate_from_measurements(&measurements, &rates, &defaults);

        let by_desc: Vec<(&str, Decimal)> = abstracts
            .iter()
            .map(|l| (l.description.as_str(), l.rate))
            .collect();
        assert_eq!(
            by_desc,
            vec![
                ("Brickwork in superstructure", Decimal::from(4850)),
                ("Plaster", Decimal::from(218)),
                ("Odd item", Decimal::ZERO),
            ]
        );
    }

    #[test]
    fn test_subtotal_sums_amounts() {
        let rates = RateTable::standard();
        let measurements = MeasurementLedger::new();
        let mut abstracts = AbstractLedger::new();

        for (quantity, rate) in [(10, 100), (5, 250)] {
            abstracts
                .add_line(
                    AbstractFields {
                        description: "item".to_string(),
                        quantity: Decimal::from(quantity),
                        rate: Decimal::from(rate),
                        ..Default::default()
                    },
                    None,
                    &rates,
                    &measurements,
                )
                .unwrap();
        }
        assert_eq!(abstracts.subtotal(), Decimal::from(2250));
    }
}
