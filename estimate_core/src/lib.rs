//! # estimate_core - Construction Cost Estimation Engine
//!
//! `estimate_core` is the recalculation heart of an estimation tool:
//! measurement lines derive quantities from dimensions, abstract-of-cost
//! lines price those quantities against a standard schedule of rates, and
//! a general abstract rolls every part up into a project grand total.
//! The engine keeps all three tiers mutually consistent after every edit.
//!
//! ## Design Philosophy
//!
//! - **Explicit aggregate**: one [`estimate::Estimate`] owns all parts and
//!   the general abstract; there is no ambient shared state
//! - **Synchronous propagation**: every mutating call runs the bottom-up
//!   recompute before it returns — no stale reads, no background jobs
//! - **Exact arithmetic**: `rust_decimal` fixed-point throughout, so
//!   recomputation is bit-identical and currency rounding is deliberate
//! - **JSON-first**: all types implement Serialize/Deserialize; the
//!   boundary layer exchanges plain row maps, never file formats
//!
//! ## Quick Start
//!
//! ```rust
//! use estimate_core::Estimate;
//! use estimate_core::measurement::MeasurementFields;
//! use rust_decimal::Decimal;
//!
//! let mut estimate = Estimate::with_standard_rates("Residence", "Engineer", "Client");
//! estimate.add_part("Ground Floor").unwrap();
//! estimate
//!     .add_measurement_line(
//!         "Ground Floor",
//!         MeasurementFields {
//!             rate_code: Some("13.1.1".to_string()),
//!             label: "Brickwork".to_string(),
//!             multiplier: Decimal::from(2),
//!             length: Decimal::from(10),
//!             breadth: Decimal::from(5),
//!             height: Decimal::from(3),
//!             unit: "cum".to_string(),
//!         },
//!     )
//!     .unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`estimate`] - The estimate aggregate and propagation engine
//! - [`part`] - Parts and part-name validation
//! - [`measurement`] - Measurement ledger (dimensions → quantities)
//! - [`abstracts`] - Abstract of cost ledger (quantities × rates)
//! - [`general_abstract`] - Project rollup with surcharges
//! - [`rates`] - Standard schedule of rates lookup
//! - [`rows`] - Row-oriented import/export boundary
//! - [`money`] - Rounding policy and percentages
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic saves and whole-estimate locking

pub mod abstracts;
pub mod errors;
pub mod estimate;
pub mod file_io;
pub mod general_abstract;
pub mod measurement;
pub mod money;
pub mod part;
pub mod rates;
pub mod rows;

// Re-export commonly used types at crate root for convenience
pub use errors::{EstimateError, EstimateResult};
pub use estimate::{Estimate, EstimateMetadata, SCHEMA_VERSION};
pub use file_io::{load_estimate, save_estimate, FileLock};
pub use general_abstract::GeneralAbstract;
pub use part::Part;
pub use rates::{RateEntry, RateTable};
