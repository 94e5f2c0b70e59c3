//! Request documents: the demand side of a matching run.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::item::{GeoPoint, Item, TimeWindow};

// ============================================================================
// RequestStatus
// ============================================================================

/// Lifecycle status of a request.
///
/// The matching engine only reads `Open` requests and only writes `Matched`;
/// `Fulfilled` is confirmed by the delivery collaborators once goods arrive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Open,
    Matched,
    Fulfilled,
}

impl RequestStatus {
    /// True if the request can still receive allocations.
    pub fn is_open(self) -> bool {
        self == RequestStatus::Open
    }
}

// ============================================================================
// Request
// ============================================================================

/// A request for goods: itemized needs with a delivery site, an urgency
/// priority, and an optional delivery window.
///
/// Invariant: need quantities are never negative, and only the allocation
/// applier decreases them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ngo_name: Option<String>,

    #[serde(default)]
    pub needs: Vec<Item>,

    /// Delivery coordinates. Requests without coordinates are never matched.
    #[serde(default)]
    pub location: Option<GeoPoint>,

    /// Urgency on a 0-5 scale; higher is more urgent. Values above 5 clamp
    /// inside the scorer.
    #[serde(default)]
    pub priority: i32,

    #[serde(default)]
    pub delivery_window: Option<TimeWindow>,

    #[serde(default)]
    pub status: RequestStatus,
}

impl Request {
    /// Create an open request with the given needs.
    pub fn new(id: impl Into<String>, needs: Vec<Item>) -> Self {
        Self {
            id: id.into(),
            needs,
            ..Default::default()
        }
    }

    pub fn with_ngo(mut self, ngo_name: impl Into<String>) -> Self {
        self.ngo_name = Some(ngo_name.into());
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_delivery_window(mut self, window: TimeWindow) -> Self {
        self.delivery_window = Some(window);
        self
    }

    /// Total outstanding need across all items, in kilograms.
    pub fn total_need_kg(&self) -> Decimal {
        self.needs.iter().map(Item::quantity_kg).sum()
    }

    /// True once every need has been drawn down to zero.
    pub fn is_satisfied(&self) -> bool {
        self.needs.iter().all(|it| it.quantity <= Decimal::ZERO)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
