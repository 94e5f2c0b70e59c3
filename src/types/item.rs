//! Shared submodels: items, coordinates, time windows.
//!
//! ## Ingestion Boundary
//!
//! Documents arrive from a loosely-typed document store. The serde layer here
//! is where their shapes are normalized: intake payloads key quantities as
//! either `quantity` or `qty`, may omit the unit, and may carry an explicit
//! `null` quantity. All of that collapses into one strict model so the engine
//! itself only ever sees well-typed input.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::quantity::to_canonical;

// ============================================================================
// GeoPoint
// ============================================================================

/// WGS84 coordinates of a pickup or delivery site.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

// ============================================================================
// TimeWindow
// ============================================================================

/// A pickup or delivery window; either bound may be open-ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    #[serde(default)]
    pub start: Option<DateTime<Utc>>,
    #[serde(default)]
    pub end: Option<DateTime<Utc>>,
}

impl TimeWindow {
    pub fn new(start: Option<DateTime<Utc>>, end: Option<DateTime<Utc>>) -> Self {
        Self { start, end }
    }

    /// A window with both bounds present.
    pub fn between(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    /// True when neither bound is set.
    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

// ============================================================================
// Item
// ============================================================================

/// One line of a donation's offered items or a request's needs.
///
/// `quantity` accepts the legacy `qty` key and treats an explicit `null` or a
/// missing value as zero. `category` and `expiry_dt` are optional hints; the
/// scorer uses `expiry_dt` for the urgency term and the run result groups
/// totals by `category` when present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,

    /// Quantity in `unit`. Missing or null means zero.
    #[serde(default, alias = "qty", deserialize_with = "null_as_zero")]
    pub quantity: Decimal,

    /// Unit string as supplied by the donor/NGO; unrecognized units are
    /// treated as already-canonical.
    #[serde(default = "default_unit")]
    pub unit: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_dt: Option<DateTime<Utc>>,
}

impl Item {
    /// Create an item with no category or expiry metadata.
    pub fn new(name: impl Into<String>, quantity: Decimal, unit: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit: unit.into(),
            category: None,
            expiry_dt: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_expiry(mut self, expiry_dt: DateTime<Utc>) -> Self {
        self.expiry_dt = Some(expiry_dt);
        self
    }

    /// This item's quantity expressed in kilograms.
    pub fn quantity_kg(&self) -> Decimal {
        to_canonical(self.quantity, &self.unit)
    }
}

fn default_unit() -> String {
    crate::types::quantity::CANONICAL_UNIT.to_string()
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Decimal>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Unit Tests
// ============================================================================
