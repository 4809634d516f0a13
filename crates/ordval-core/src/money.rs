//! Serde helpers for monetary fields.
//!
//! Amounts travel as JSON numbers. Inbound values produced by the extractor
//! may be missing, `null`, integers, floats, or numeric strings; all of them
//! land in a [`Decimal`], with absent values read as zero.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serializer};

/// Absolute difference below which two amounts are considered equal.
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Returns `true` when `a` and `b` differ by no more than [`TOLERANCE`].
#[must_use]
pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= TOLERANCE
}

/// Rounds to cents, half away from zero.
#[must_use]
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount the way it appears in customer-facing messages, e.g. `R$ 50.00`.
#[must_use]
pub fn brl(amount: Decimal) -> String {
    let mut cents = round_cents(amount);
    cents.rescale(2);
    format!("R$ {cents}")
}

/// `#[serde(with = ...)]` module: serializes as a float, deserializes
/// leniently with `null` mapped to zero.
pub mod lenient {
    use super::{Decimal, Deserialize, Deserializer, Serializer};

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        rust_decimal::serde::float::serialize(value, serializer)
    }

    /// # Errors
    ///
    /// Returns an error when the value is neither null nor numeric.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
    }
}
