//! Price arithmetic for the member discount.
//!
//! Prices are `rust_decimal::Decimal` in the currency's standard unit
//! (dollars, not cents). No rounding happens here: the host's price formatter
//! rounds for display, so the full precision of the product is preserved.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{RuleError, RuleResult};
use crate::value_object::ValueObject;

/// Fraction of the regular price taken off for members, in `[0, 1)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct DiscountFraction(Decimal);

impl ValueObject for DiscountFraction {}

impl DiscountFraction {
    /// Create a fraction, rejecting values outside `[0, 1)`.
    pub fn new(fraction: Decimal) -> RuleResult<Self> {
        if fraction < Decimal::ZERO {
            return Err(RuleError::config(format!(
                "discount fraction must not be negative (got {fraction})"
            )));
        }
        if fraction >= Decimal::ONE {
            return Err(RuleError::config(format!(
                "discount fraction must be below 1 (got {fraction})"
            )));
        }
        Ok(Self(fraction))
    }

    /// Create a fraction from a whole percentage (`10` → `0.10`).
    pub fn from_percent(percent: u32) -> RuleResult<Self> {
        Self::new(Decimal::new(i64::from(percent), 2))
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// `regular × (1 − fraction)`, clamped at zero.
    ///
    /// A negative regular price can only come from corrupt host data; it clamps
    /// to zero rather than producing a negative charge.
    pub fn apply(&self, regular: Decimal) -> Decimal {
        regular
            .saturating_mul(Decimal::ONE - self.0)
            .max(Decimal::ZERO)
    }
}

impl Default for DiscountFraction {
    fn default() -> Self {
        Self(Decimal::new(10, 2))
    }
}

impl TryFrom<Decimal> for DiscountFraction {
    type Error = RuleError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountFraction> for Decimal {
    fn from(value: DiscountFraction) -> Self {
        value.0
    }
}

impl core::fmt::Display for DiscountFraction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}
