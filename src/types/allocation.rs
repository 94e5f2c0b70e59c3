//! Allocation records: the engine's sole persisted output.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::quantity::CANONICAL_UNIT;

/// A quantity of one item label moved from one donation to one request.
///
/// ## Immutability
///
/// An allocation is an append-only audit record. It is never edited after
/// creation, only possibly superseded by a later run's records. The applier
/// persists these verbatim before touching any source document, so the record
/// survives even when the physical decrement can no longer be applied.
///
/// ## Example
///
/// ```
/// use foodbridge_engine::types::Allocation;
/// use rust_decimal::Decimal;
/// use chrono::Utc;
///
/// let allocation = Allocation::new(
///     "d1",               // donation_id
///     "r1",               // request_id
///     "bread",            // item_label
///     Decimal::from(6),   // quantity (kg)
///     0.0,                // distance_km
///     0.66,               // score
///     Utc::now(),
/// );
/// assert_eq!(allocation.unit, "kg");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    /// Source donation
    pub donation_id: String,

    /// Receiving request
    pub request_id: String,

    /// Canonicalized item label the quantity was allocated under
    pub item_label: String,

    /// Optional category hint carried over from the donation's items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Allocated quantity in the canonical unit
    pub quantity: Decimal,

    /// Always the canonical unit label ("kg")
    pub unit: String,

    /// Great-circle distance between donation and request sites
    pub distance_km: f64,

    /// Composite compatibility score at allocation time
    pub score: f64,

    /// Run timestamp (the caller-supplied `now`)
    pub created_at: DateTime<Utc>,
}

impl Allocation {
    /// Create an allocation record in the canonical unit.
    pub fn new(
        donation_id: impl Into<String>,
        request_id: impl Into<String>,
        item_label: impl Into<String>,
        quantity: Decimal,
        distance_km: f64,
        score: f64,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            donation_id: donation_id.into(),
            request_id: request_id.into(),
            item_label: item_label.into(),
            category: None,
            quantity,
            unit: CANONICAL_UNIT.to_string(),
            distance_km,
            score,
            created_at,
        }
    }

    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category;
        self
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
