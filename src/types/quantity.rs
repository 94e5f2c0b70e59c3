//! Unit normalization for item quantities.
//!
//! ## Canonical Unit
//!
//! All matching math runs in kilograms. Donations and requests may carry
//! quantities in grams or pounds; those are converted on the way into the
//! residual ledger and converted back when the applier decrements the source
//! documents.
//!
//! ## Permissive Fallback
//!
//! An unrecognized unit string is treated as already-canonical (identity
//! conversion). Unknown units must never abort a matching run; callers that
//! want to observe the fallback use [`Unit::parse`] and report a
//! [`Diagnostic`](crate::types::Diagnostic).
//!
//! ## Why Decimal?
//!
//! Quantities use `rust_decimal::Decimal` rather than `f64`: the residual
//! ledger is debited and credited many times per run, and the no-over-
//! allocation invariant is an exact equality, not a tolerance check.
//!
//! ## Examples
//!
//! ```
//! use foodbridge_engine::types::quantity::{to_canonical, from_canonical};
//! use rust_decimal::Decimal;
//!
//! // 2000 g -> 2 kg
//! assert_eq!(to_canonical(Decimal::from(2000), "g"), Decimal::from(2));
//!
//! // unrecognized units pass through untouched
//! assert_eq!(to_canonical(Decimal::from(3), "palettes"), Decimal::from(3));
//! ```

use rust_decimal::Decimal;

/// Label used on allocation records for canonicalized quantities.
pub const CANONICAL_UNIT: &str = "kg";

/// A recognized quantity unit.
///
/// Parsing is case-insensitive and accepts the common singular/plural and
/// abbreviated spellings seen in intake payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Unit {
    /// Kilograms - the canonical unit (identity conversion)
    #[default]
    Kilograms,
    /// Grams (1000 g = 1 kg)
    Grams,
    /// Avoirdupois pounds (1 lb = 0.45359237 kg exactly)
    Pounds,
}

impl Unit {
    /// Parse a unit string.
    ///
    /// Returns `None` for anything outside the three recognized unit
    /// families; callers decide whether that is a fallback or a diagnostic.
    ///
    /// # Example
    ///
    /// ```
    /// use foodbridge_engine::types::quantity::Unit;
    ///
    /// assert_eq!(Unit::parse(" KG "), Some(Unit::Kilograms));
    /// assert_eq!(Unit::parse("lbs"), Some(Unit::Pounds));
    /// assert_eq!(Unit::parse("palettes"), None);
    /// ```
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "kg" | "kilogram" | "kilograms" => Some(Unit::Kilograms),
            "g" | "gram" | "grams" => Some(Unit::Grams),
            "lb" | "lbs" | "pound" | "pounds" => Some(Unit::Pounds),
            _ => None,
        }
    }

    /// Convert a quantity in this unit to kilograms.
    pub fn to_canonical(self, quantity: Decimal) -> Decimal {
        match self {
            Unit::Kilograms => quantity,
            Unit::Grams => quantity / grams_per_kg(),
            Unit::Pounds => quantity * kg_per_pound(),
        }
    }

    /// Convert a quantity in kilograms back into this unit.
    pub fn from_canonical(self, kg: Decimal) -> Decimal {
        match self {
            Unit::Kilograms => kg,
            Unit::Grams => kg * grams_per_kg(),
            Unit::Pounds => kg / kg_per_pound(),
        }
    }
}

fn grams_per_kg() -> Decimal {
    Decimal::from(1000)
}

fn kg_per_pound() -> Decimal {
    // 0.45359237, the exact international avoirdupois definition
    Decimal::new(45_359_237, 8)
}

// ============================================================================
// Permissive Conversion Functions
// ============================================================================

/// Convert a quantity/unit pair to kilograms.
///
/// Unrecognized units fall back to identity conversion.
///
/// # Example
///
/// ```
/// use foodbridge_engine::types::quantity::to_canonical;
/// use rust_decimal::Decimal;
///
/// assert_eq!(to_canonical(Decimal::from(500), "g"), Decimal::new(5, 1));
/// assert_eq!(to_canonical(Decimal::from(7), "kg"), Decimal::from(7));
/// ```
pub fn to_canonical(quantity: Decimal, unit: &str) -> Decimal {
    match Unit::parse(unit) {
        Some(u) => u.to_canonical(quantity),
        None => quantity,
    }
}

/// Convert a kilogram quantity back into the given unit.
///
/// The inverse of [`to_canonical`], with the same identity fallback for
/// unrecognized units.
pub fn from_canonical(kg: Decimal, unit: &str) -> Decimal {
    match Unit::parse(unit) {
        Some(u) => u.from_canonical(kg),
        None => kg,
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
