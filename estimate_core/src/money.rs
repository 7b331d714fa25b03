//! # Money & Percentage Helpers
//!
//! Fixed-point arithmetic policy for the estimate. All quantities, rates
//! and amounts are [`rust_decimal::Decimal`] values, so recomputation is
//! exact and bit-identical across runs.
//!
//! ## Rounding Policy
//!
//! Quantities and measurement totals keep full precision. Currency amounts
//! are rounded to 2 decimal places, midpoint away from zero, at each stage
//! where a currency value is defined: line amount, part subtotal, and each
//! surcharge stage of the general abstract.
//!
//! ## Example
//!
//! ```rust
//! use estimate_core::money::{round_currency, Percent};
//! use rust_decimal::Decimal;
//!
//! let subtotal = Decimal::from(1_455_000);
//! let electrification = Percent::new(Decimal::from(7)).unwrap();
//! assert_eq!(electrification.apply(subtotal), Decimal::from(1_556_850));
//!
//! let exact: Decimal = "10.005".parse().unwrap();
//! assert_eq!(round_currency(exact), "10.01".parse().unwrap());
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::errors::{EstimateError, EstimateResult};

/// Number of decimal places carried by currency amounts
pub const CURRENCY_SCALE: u32 = 2;

/// Round a currency amount to 2 decimal places, midpoint away from zero.
pub fn round_currency(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(CURRENCY_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Validate that a numeric field is non-negative.
///
/// Used by ledger operations before any state is mutated, so a failed
/// validation leaves the estimate untouched.
pub fn require_non_negative(field: &str, value: Decimal) -> EstimateResult<()> {
    if value < Decimal::ZERO {
        return Err(EstimateError::validation(
            field,
            value.to_string(),
            "must be non-negative",
        ));
    }
    Ok(())
}

/// A surcharge percentage (e.g., 7 means 7%).
///
/// Newtype wrapper rather than a bare Decimal so a percentage can never be
/// confused with a factor or an amount. Serializes as a plain number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Percent(Decimal);

impl Percent {
    /// Create a percentage, rejecting negative values.
    pub fn new(value: Decimal) -> EstimateResult<Self> {
        require_non_negative("percent", value)?;
        Ok(Percent(value))
    }

    /// The raw percentage value (7 for 7%).
    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Apply this surcharge to an amount and round to currency scale:
    /// `round2(amount × (1 + percent/100))`.
    pub fn apply(&self, amount: Decimal) -> Decimal {
        round_currency(amount * (Decimal::ONE + self.0 / Decimal::from(100)))
    }
}
