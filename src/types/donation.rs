//! Donation documents: the supply side of a matching run.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::item::{GeoPoint, Item, TimeWindow};

// ============================================================================
// DonationStatus
// ============================================================================

/// Lifecycle status of a donation.
///
/// The matching engine only ever reads `Open` donations and only ever writes
/// `Matched` and `Closed`; the pickup/delivery transitions belong to the
/// dispatch collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DonationStatus {
    #[default]
    Open,
    Matched,
    PickedUp,
    Delivered,
    Closed,
    Canceled,
}

impl DonationStatus {
    /// True if the donation can still supply a matching run.
    pub fn is_open(self) -> bool {
        self == DonationStatus::Open
    }

    /// True once the donation can never re-enter matching.
    pub fn is_terminal(self) -> bool {
        matches!(self, DonationStatus::Closed | DonationStatus::Canceled)
    }
}

// ============================================================================
// Donation
// ============================================================================

/// A donation offer: itemized supply with a pickup site and optional
/// availability constraints.
///
/// Invariant: item quantities are never negative, and only the allocation
/// applier decreases them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Donation {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub donor_name: Option<String>,

    #[serde(default)]
    pub items: Vec<Item>,

    /// Pickup coordinates. Donations without coordinates are never matched.
    #[serde(default)]
    pub location: Option<GeoPoint>,

    /// Earliest pickup time, if the donor declared one.
    #[serde(default)]
    pub ready_after: Option<DateTime<Utc>>,

    /// Soft pickup window; either bound may be open-ended.
    #[serde(default)]
    pub pickup_window: Option<TimeWindow>,

    #[serde(default)]
    pub status: DonationStatus,
}

impl Donation {
    /// Create an open donation with the given items.
    pub fn new(id: impl Into<String>, items: Vec<Item>) -> Self {
        Self {
            id: id.into(),
            items,
            ..Default::default()
        }
    }

    pub fn with_donor(mut self, donor_name: impl Into<String>) -> Self {
        self.donor_name = Some(donor_name.into());
        self
    }

    pub fn with_location(mut self, location: GeoPoint) -> Self {
        self.location = Some(location);
        self
    }

    pub fn with_ready_after(mut self, ready_after: DateTime<Utc>) -> Self {
        self.ready_after = Some(ready_after);
        self
    }

    pub fn with_pickup_window(mut self, window: TimeWindow) -> Self {
        self.pickup_window = Some(window);
        self
    }

    /// Total offered quantity across all items, in kilograms.
    pub fn total_quantity_kg(&self) -> Decimal {
        self.items.iter().map(Item::quantity_kg).sum()
    }

    /// True once every item quantity has been drawn down to zero.
    pub fn is_depleted(&self) -> bool {
        self.items.iter().all(|it| it.quantity <= Decimal::ZERO)
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
