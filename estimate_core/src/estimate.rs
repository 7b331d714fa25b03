//! # Estimate Aggregate & Propagation Engine
//!
//! The `Estimate` struct is the root container for one construction cost
//! estimate. Estimates serialize to `.est` files as human-readable JSON.
//!
//! ## Structure
//!
//! ```text
//! Estimate
//! ├── meta: EstimateMetadata (version, title, preparer, timestamps)
//! ├── rates: RateTable (standard schedule of rates)
//! ├── parts: Vec<Part> (each: measurement ledger + abstract of cost)
//! └── general: GeneralAbstract (per-part subtotals + surcharges)
//! ```
//!
//! ## Consistency
//!
//! All mutations go through the aggregate, which runs a strict bottom-up
//! recompute before returning:
//!
//! ```text
//! measurement total → linked abstract quantity/amount
//!                   → part subtotal
//!                   → general abstract subtotal/grand total
//! ```
//!
//! Mutations at the abstract tier recompute from that tier upward only.
//! Everything is synchronous and single-writer: no observer can see a
//! partially propagated state, and a failed operation leaves the estimate
//! unchanged. Bulk import appends every row first and propagates once per
//! part, not once per row.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::estimate::Estimate;
//! use estimate_core::measurement::MeasurementFields;
//! use rust_decimal::Decimal;
//!
//! let mut estimate = Estimate::with_standard_rates("Residence", "A. Sharma", "Client");
//! estimate.add_part("Ground Floor").unwrap();
//!
//! let fields = MeasurementFields {
//!     label: "Brickwork".to_string(),
//!     multiplier: Decimal::from(2),
//!     length: Decimal::from(10),
//!     breadth: Decimal::from(5),
//!     height: Decimal::from(3),
//!     unit: "cum".to_string(),
//!     ..Default::default()
//! };
//! let id = estimate.add_measurement_line("Ground Floor", fields).unwrap();
//!
//! let part = estimate.part("Ground Floor").unwrap();
//! assert_eq!(part.measurements.get(id).unwrap().total, Decimal::from(300));
//! ```

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::abstracts::AbstractFields;
use crate::errors::{EstimateError, EstimateResult};
use crate::general_abstract::GeneralAbstract;
use crate::measurement::MeasurementFields;
use crate::money::Percent;
use crate::part::{validate_part_name, Part};
use crate::rates::{RateEntry, RateTable};

/// Current schema version for .est files
pub const SCHEMA_VERSION: &str = "0.1.0";

/// Estimate metadata stored in the file header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimateMetadata {
    /// Schema version (for migration compatibility)
    pub version: String,

    /// Project title (e.g., "Residential Building at Plot 14")
    pub title: String,

    /// Who prepared the estimate
    pub prepared_by: String,

    /// Client name
    pub client: String,

    /// When the estimate was created
    pub created: DateTime<Utc>,

    /// When the estimate was last modified
    pub modified: DateTime<Utc>,
}

/// Root estimate container.
///
/// Parts are stored in a `Vec` because their order is meaningful: it is
/// the general abstract's display order. The general abstract keeps one
/// entry per part and the aggregate keeps both sides aligned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    /// Estimate metadata
    pub meta: EstimateMetadata,

    /// Standard schedule of rates in force for this estimate
    pub rates: RateTable,

    /// All parts, in creation order unless explicitly resequenced
    parts: Vec<Part>,

    /// The project-level rollup
    general: GeneralAbstract,
}

impl Estimate {
    /// Create a new empty estimate with an empty rate table.
    pub fn new(
        title: impl Into<String>,
        prepared_by: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Estimate {
            meta: EstimateMetadata {
                version: SCHEMA_VERSION.to_string(),
                title: title.into(),
                prepared_by: prepared_by.into(),
                client: client.into(),
                created: now,
                modified: now,
            },
            rates: RateTable::new(),
            parts: Vec::new(),
            general: GeneralAbstract::new(),
        }
    }

    /// Create a new estimate preloaded with the bundled standard rates.
    pub fn with_standard_rates(
        title: impl Into<String>,
        prepared_by: impl Into<String>,
        client: impl Into<String>,
    ) -> Self {
        let mut estimate = Estimate::new(title, prepared_by, client);
        estimate.rates = RateTable::standard();
        estimate
    }

    /// Update the modified timestamp.
    pub fn touch(&mut self) {
        self.meta.modified = Utc::now();
    }

    // ========================================================================
    // Part lifecycle
    // ========================================================================

    /// Add an empty part at the end of the ordering.
    ///
    /// Fails with `Validation` for a bad name and `DuplicateName` when a
    /// part with the same name (compared case-insensitively) exists. On
    /// failure the part ordering is unchanged.
    pub fn add_part(&mut self, name: impl Into<String>) -> EstimateResult<()> {
        let name = name.into();
        validate_part_name(&name)?;
        let lower = name.to_lowercase();
        if self.parts.iter().any(|p| p.name.to_lowercase() == lower) {
            return Err(EstimateError::duplicate_name(name));
        }
        self.parts.push(Part::new(name.clone())?);
        self.general.register_part(name);
        self.touch();
        Ok(())
    }

    /// The subtotal that would be lost by removing a part.
    ///
    /// Dry-run counterpart of [`remove_part`](Estimate::remove_part) so the
    /// boundary layer can show an impact preview before confirming.
    pub fn remove_part_preview(&self, name: &str) -> EstimateResult<Decimal> {
        Ok(self.part(name)?.subtotal)
    }

    /// Remove a part and its contribution to the general abstract.
    ///
    /// Destructive and irreversible without an external backup. Returns
    /// the subtotal that was removed.
    pub fn remove_part(&mut self, name: &str) -> EstimateResult<Decimal> {
        let index = self.part_index(name)?;
        // Drop the general abstract entry first: if either removal could
        // fail, it fails here, before any state has been mutated.
        let lost = self.general.remove_part(name)?;
        self.parts.remove(index);
        self.touch();
        Ok(lost)
    }

    /// Resequence a part within the general abstract ordering.
    pub fn move_part(&mut self, name: &str, new_index: usize) -> EstimateResult<()> {
        let index = self.part_index(name)?;
        self.general.move_part(name, new_index)?;
        let part = self.parts.remove(index);
        self.parts.insert(new_index, part);
        self.touch();
        Ok(())
    }

    /// Get a part by name.
    pub fn part(&self, name: &str) -> EstimateResult<&Part> {
        self.parts
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| EstimateError::not_found("Part", name))
    }

    /// Iterate parts in their current order.
    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Number of parts.
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// The general abstract rollup.
    pub fn general_abstract(&self) -> &GeneralAbstract {
        &self.general
    }

    /// Replace the surcharge percentages and re-derive the grand total.
    pub fn set_surcharges(&mut self, electrification: Percent, prorata: Percent) {
        self.general.set_surcharges(electrification, prorata);
        self.touch();
    }

    // ========================================================================
    // Measurement tier
    // ========================================================================

    /// Add a measurement line to a part. Returns the new line's id.
    pub fn add_measurement_line(
        &mut self,
        part_name: &str,
        fields: MeasurementFields,
    ) -> EstimateResult<Uuid> {
        let index = self.part_index(part_name)?;
        let id = self.parts[index].measurements.add_line(fields)?;
        self.propagate_from_measurements(index);
        self.touch();
        Ok(id)
    }

    /// Update a measurement line's fields.
    ///
    /// The new total is propagated to any linked abstract line, the part
    /// subtotal and the general abstract before this call returns.
    pub fn update_measurement_line(
        &mut self,
        part_name: &str,
        id: Uuid,
        fields: MeasurementFields,
    ) -> EstimateResult<()> {
        let index = self.part_index(part_name)?;
        self.parts[index].measurements.update_line(id, fields)?;
        self.propagate_from_measurements(index);
        self.touch();
        Ok(())
    }

    /// Remove a measurement line.
    ///
    /// Any abstract line linked to it has its link nulled (the abstract
    /// line itself survives with its last derived quantity).
    pub fn remove_measurement_line(&mut self, part_name: &str, id: Uuid) -> EstimateResult<()> {
        let index = self.part_index(part_name)?;
        self.parts[index].measurements.remove_line(id)?;
        self.parts[index].abstracts.clear_links_to(id);
        self.propagate_from_measurements(index);
        self.touch();
        Ok(())
    }

    /// Bulk-import measurement rows into a part as one atomic batch.
    ///
    /// All rows are validated up front (all-or-nothing), appended, and
    /// then propagation runs once for the part — not once per row.
    pub fn import_measurements(
        &mut self,
        part_name: &str,
        rows: Vec<MeasurementFields>,
    ) -> EstimateResult<Vec<Uuid>> {
        let index = self.part_index(part_name)?;
        for fields in &rows {
            fields.validate()?;
        }
        let mut ids = Vec::with_capacity(rows.len());
        for fields in rows {
            // Validated above; add_line re-checks but cannot fail now.
            ids.push(self.parts[index].measurements.add_line(fields)?);
        }
        self.propagate_from_measurements(index);
        self.touch();
        Ok(ids)
    }

    /// Recompute every derived value in the estimate from the leaves up.
    ///
    /// Deterministic and idempotent: running twice yields bit-identical
    /// totals. Intended after bulk edits made through deserialization.
    pub fn recompute_all(&mut self) {
        for index in 0..self.parts.len() {
            self.parts[index].measurements.recompute_all();
            self.propagate_from_measurements(index);
        }
        self.general.recompute();
    }

    // ========================================================================
    // Abstract tier
    // ========================================================================

    /// Add an abstract line to a part, optionally linked to one of the
    /// part's measurement lines. Returns the new line's id.
    pub fn add_abstract_line(
        &mut self,
        part_name: &str,
        fields: AbstractFields,
        linked: Option<Uuid>,
    ) -> EstimateResult<Uuid> {
        let index = self.part_index(part_name)?;
        let part = &mut self.parts[index];
        let id = part
            .abstracts
            .add_line(fields, linked, &self.rates, &part.measurements)?;
        self.propagate_from_abstracts(index);
        self.touch();
        Ok(id)
    }

    /// Update an abstract line's fields.
    ///
    /// Editing the quantity of a linked line fails with
    /// `InvalidOperation`; derived quantities change only through the
    /// measurement tier.
    pub fn update_abstract_line(
        &mut self,
        part_name: &str,
        id: Uuid,
        fields: AbstractFields,
    ) -> EstimateResult<()> {
        let index = self.part_index(part_name)?;
        self.parts[index].abstracts.update_line(id, fields)?;
        self.propagate_from_abstracts(index);
        self.touch();
        Ok(())
    }

    /// Remove an abstract line. The linked measurement line, if any, is
    /// untouched.
    pub fn remove_abstract_line(&mut self, part_name: &str, id: Uuid) -> EstimateResult<()> {
        let index = self.part_index(part_name)?;
        self.parts[index].abstracts.remove_line(id)?;
        self.propagate_from_abstracts(index);
        self.touch();
        Ok(())
    }

    /// Create linked abstract lines for every measurement line in the
    /// part that lacks one. Idempotent. Returns the number created.
    pub fn auto_generate_abstracts(
        &mut self,
        part_name: &str,
        default_rates_by_unit: &HashMap<String, Decimal>,
    ) -> EstimateResult<usize> {
        let index = self.part_index(part_name)?;
        let part = &mut self.parts[index];
        let created = part.abstracts.auto_generate_from_measurements(
            &part.measurements,
            &self.rates,
            default_rates_by_unit,
        );
        self.propagate_from_abstracts(index);
        self.touch();
        Ok(created)
    }

    // ========================================================================
    // Rate table passthroughs
    // ========================================================================

    /// Insert or replace a rate entry.
    pub fn upsert_rate(&mut self, entry: RateEntry) -> EstimateResult<()> {
        self.rates.upsert(entry)?;
        self.touch();
        Ok(())
    }

    /// Look up a rate entry by code.
    pub fn lookup_rate(&self, code: &str) -> EstimateResult<&RateEntry> {
        self.rates.lookup(code)
    }

    /// Search rate entries by substring.
    pub fn search_rates(&self, text: &str) -> Vec<&RateEntry> {
        self.rates.search(text)
    }

    // ========================================================================
    // Propagation engine (private)
    // ========================================================================

    fn part_index(&self, name: &str) -> EstimateResult<usize> {
        self.parts
            .iter()
            .position(|p| p.name == name)
            .ok_or_else(|| EstimateError::not_found("Part", name))
    }

    /// Bottom-up recompute starting from the measurement tier of one part.
    fn propagate_from_measurements(&mut self, index: usize) {
        let part = &mut self.parts[index];
        part.abstracts.sync_from_measurements(&part.measurements);
        self.propagate_from_abstracts(index);
    }

    /// Recompute from the abstract tier of one part upward.
    fn propagate_from_abstracts(&mut self, index: usize) {
        self.parts[index].recompute_subtotal();
        let name = self.parts[index].name.clone();
        let subtotal = self.parts[index].subtotal;
        // Every part has a general abstract entry from add_part onward; a
        // miss here means the two sides have desynced.
        let result = self.general.set_part_subtotal(&name, subtotal);
        debug_assert!(
            result.is_ok(),
            "general abstract has no entry for part '{}'",
            name
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brickwork_fields() -> MeasurementFields {
        MeasurementFields {
            rate_code: Some("13.1.1".to_string()),
            label: "Brickwork in superstructure".to_string(),
            multiplier: Decimal::from(2),
            length: Decimal::from(10),
            breadth: Decimal::from(5),
            height: Decimal::from(3),
            unit: "cum".to_string(),
        }
    }

    fn ground_floor_estimate() -> (Estimate, Uuid, Uuid) {
        let mut estimate = Estimate::with_standard_rates("Residence", "Engineer", "Client");
        estimate.add_part("Ground Floor").unwrap();
        let m_id = estimate
            .add_measurement_line("Ground Floor", brickwork_fields())
            .unwrap();
        let a_id = estimate
            .add_abstract_line(
                "Ground Floor",
                AbstractFields {
                    rate_code: Some("13.1.1".to_string()),
                    ..Default::default()
                },
                Some(m_id),
            )
            .unwrap();
        (estimate, m_id, a_id)
    }

    #[test]
    fn test_ground_floor_scenario() {
        let (estimate, m_id, a_id) = ground_floor_estimate();

        let part = estimate.part("Ground Floor").unwrap();
        assert_eq!(part.measurements.get(m_id).unwrap().total, Decimal::from(300));

        let line = part.abstracts.get(a_id).unwrap();
        assert_eq!(line.quantity, Decimal::from(300));
        assert_eq!(line.amount, Decimal::from(1_455_000));
        assert_eq!(part.subtotal, Decimal::from(1_455_000));

        let general = estimate.general_abstract();
        assert_eq!(general.subtotal, Decimal::from(1_455_000));
        // 1,455,000 × 1.07 × 1.13 = 1,759,240.50
        assert_eq!(
            general.grand_total,
            "1759240.50".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn test_measurement_edit_propagates_in_one_call() {
        let (mut estimate, m_id, a_id) = ground_floor_estimate();

        let mut edited = brickwork_fields();
        edited.length = Decimal::from(12);
        estimate
            .update_measurement_line("Ground Floor", m_id, edited)
            .unwrap();

        let part = estimate.part("Ground Floor").unwrap();
        assert_eq!(part.measurements.get(m_id).unwrap().total, Decimal::from(360));

        let line = part.abstracts.get(a_id).unwrap();
        assert_eq!(line.quantity, Decimal::from(360));
        assert_eq!(line.amount, Decimal::from(1_746_000));
        assert_eq!(part.subtotal, Decimal::from(1_746_000));

        // 1,746,000 × 1.07 × 1.13 = 2,111,088.60
        assert_eq!(
            estimate.general_abstract().grand_total,
            "2111088.60".parse::<Decimal>().unwrap()
        );
    }

    #[test]
    fn test_removing_linked_measurement_nulls_link() {
        let (mut estimate, m_id, a_id) = ground_floor_estimate();

        estimate
            .remove_measurement_line("Ground Floor", m_id)
            .unwrap();

        let part = estimate.part("Ground Floor").unwrap();
        assert!(part.measurements.is_empty());

        // Abstract line survives, unlinked, with its last derived quantity
        let line = part.abstracts.get(a_id).unwrap();
        assert!(!line.is_linked());
        assert_eq!(line.quantity, Decimal::from(300));
        assert_eq!(part.subtotal, Decimal::from(1_455_000));
    }

    #[test]
    fn test_failed_update_leaves_state_unchanged() {
        let (mut estimate, m_id, _) = ground_floor_estimate();
        let before = estimate.part("Ground Floor").unwrap().clone();

        let mut bad = brickwork_fields();
        bad.length = Decimal::from(-1);
        let err = estimate
            .update_measurement_line("Ground Floor", m_id, bad)
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION");
        assert_eq!(estimate.part("Ground Floor").unwrap(), &before);
    }

    #[test]
    fn test_add_part_rejections_leave_ordering_unchanged() {
        let mut estimate = Estimate::new("Test", "E", "C");
        estimate.add_part("Ground Floor").unwrap();
        estimate.add_part("First Floor").unwrap();
        let order_before = estimate.general_abstract().part_order().join(",");

        let empty = estimate.add_part("").unwrap_err();
        assert_eq!(empty.error_code(), "VALIDATION");

        let dup = estimate.add_part("ground floor").unwrap_err();
        assert_eq!(dup.error_code(), "DUPLICATE_NAME");

        let slash = estimate.add_part("Roof/Terrace").unwrap_err();
        assert_eq!(slash.error_code(), "VALIDATION");

        assert_eq!(
            estimate.general_abstract().part_order().join(","),
            order_before
        );
        assert_eq!(estimate.part_count(), 2);
    }

    #[test]
    fn test_remove_part_preview_and_remove() {
        let (mut estimate, _, _) = ground_floor_estimate();
        estimate.add_part("First Floor").unwrap();

        let preview = estimate.remove_part_preview("Ground Floor").unwrap();
        assert_eq!(preview, Decimal::from(1_455_000));
        // Preview does not mutate
        assert_eq!(estimate.part_count(), 2);

        let lost = estimate.remove_part("Ground Floor").unwrap();
        assert_eq!(lost, Decimal::from(1_455_000));
        assert_eq!(estimate.part_count(), 1);
        assert_eq!(estimate.general_abstract().subtotal, Decimal::ZERO);
        assert_eq!(estimate.general_abstract().grand_total, Decimal::ZERO);

        let err = estimate.remove_part("Ground Floor").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
    }

    #[test]
    fn test_failed_remove_part_leaves_state_unchanged() {
        let (mut estimate, _, _) = ground_floor_estimate();
        let before = estimate.clone();

        let err = estimate.remove_part("Basement").unwrap_err();
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert_eq!(estimate.part_count(), before.part_count());
        assert_eq!(
            estimate.general_abstract().part_order(),
            before.general_abstract().part_order()
        );
        assert_eq!(
            estimate.general_abstract().grand_total,
            before.general_abstract().grand_total
        );
    }

    #[test]
    fn test_parts_and_general_stay_aligned_through_lifecycle() {
        let mut estimate = Estimate::with_standard_rates("Test", "E", "C");
        estimate.add_part("A").unwrap();
        estimate.add_part("B").unwrap();
        estimate.add_part("C").unwrap();
        estimate
            .add_measurement_line("B", brickwork_fields())
            .unwrap();
        estimate
            .auto_generate_abstracts("B", &HashMap::new())
            .unwrap();
        estimate.remove_part("A").unwrap();
        estimate.move_part("C", 0).unwrap();

        let m_id = estimate
            .part("B")
            .unwrap()
            .measurements
            .iter()
            .next()
            .unwrap()
            .id;
        estimate
            .update_measurement_line("B", m_id, brickwork_fields())
            .unwrap();

        let part_names: Vec<&str> = estimate.parts().map(|p| p.name.as_str()).collect();
        assert_eq!(estimate.general_abstract().part_order(), part_names);
        for part in estimate.parts() {
            let entry = estimate
                .general_abstract()
                .part_totals
                .iter()
                .find(|t| t.name == part.name)
                .unwrap();
            assert_eq!(entry.subtotal, part.subtotal);
        }
    }

    #[test]
    fn test_move_part_keeps_parts_and_general_aligned() {
        let mut estimate = Estimate::new("Test", "E", "C");
        estimate.add_part("A").unwrap();
        estimate.add_part("B").unwrap();
        estimate.add_part("C").unwrap();

        estimate.move_part("C", 0).unwrap();
        let part_names: Vec<&str> = estimate.parts().map(|p| p.name.as_str()).collect();
        assert_eq!(part_names, vec!["C", "A", "B"]);
        assert_eq!(estimate.general_abstract().part_order(), vec!["C", "A", "B"]);
    }

    #[test]
    fn test_import_measurements_is_all_or_nothing() {
        let mut estimate = Estimate::with_standard_rates("Test", "E", "C");
        estimate.add_part("Ground Floor").unwrap();

        let mut bad = brickwork_fields();
        bad.height = Decimal::from(-3);
        let err = estimate
            .import_measurements("Ground Floor", vec![brickwork_fields(), bad])
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION");
        assert!(estimate.part("Ground Floor").unwrap().measurements.is_empty());

        let ids = estimate
            .import_measurements(
                "Ground Floor",
                vec![brickwork_fields(), brickwork_fields()],
            )
            .unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(
            estimate.part("Ground Floor").unwrap().measurements.len(),
            2
        );
    }

    #[test]
    fn test_recompute_all_is_bit_identical() {
        let (mut estimate, _, _) = ground_floor_estimate();
        estimate.add_part("First Floor").unwrap();
        estimate
            .add_measurement_line("First Floor", brickwork_fields())
            .unwrap();
        estimate
            .auto_generate_abstracts("First Floor", &HashMap::new())
            .unwrap();

        estimate.recompute_all();
        let first = (
            estimate.general_abstract().clone(),
            estimate.parts().cloned().collect::<Vec<_>>(),
        );
        estimate.recompute_all();
        let second = (
            estimate.general_abstract().clone(),
            estimate.parts().cloned().collect::<Vec<_>>(),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn test_multiple_parts_roll_up() {
        let (mut estimate, _, _) = ground_floor_estimate();
        estimate.add_part("First Floor").unwrap();
        let m_id = estimate
            .add_measurement_line("First Floor", brickwork_fields())
            .unwrap();
        estimate
            .add_abstract_line(
                "First Floor",
                AbstractFields {
                    rate_code: Some("13.1.1".to_string()),
                    ..Default::default()
                },
                Some(m_id),
            )
            .unwrap();

        assert_eq!(
            estimate.general_abstract().subtotal,
            Decimal::from(2_910_000)
        );
    }

    #[test]
    fn test_abstract_rate_edit_recomputes_upward_only() {
        let (mut estimate, m_id, a_id) = ground_floor_estimate();

        let current = estimate
            .part("Ground Floor")
            .unwrap()
            .abstracts
            .get(a_id)
            .unwrap()
            .clone();
        estimate
            .update_abstract_line(
                "Ground Floor",
                a_id,
                AbstractFields {
                    rate_code: current.rate_code,
                    description: current.description,
                    unit: current.unit,
                    quantity: current.quantity,
                    rate: Decimal::from(5000),
                },
            )
            .unwrap();

        let part = estimate.part("Ground Floor").unwrap();
        // Measurement tier untouched
        assert_eq!(part.measurements.get(m_id).unwrap().total, Decimal::from(300));
        assert_eq!(part.subtotal, Decimal::from(1_500_000));
        assert_eq!(
            estimate.general_abstract().subtotal,
            Decimal::from(1_500_000)
        );
    }

    #[test]
    fn test_estimate_serialization_roundtrip() {
        let (estimate, _, _) = ground_floor_estimate();
        let json = serde_json::to_string_pretty(&estimate).unwrap();
        let roundtrip: Estimate = serde_json::from_str(&json).unwrap();
        assert_eq!(roundtrip, estimate);
    }
}
