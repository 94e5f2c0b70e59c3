//! Time-window feasibility between a donation's pickup availability and a
//! request's delivery window.
//!
//! This is a conservative interval-overlap test, not a scheduling solver:
//! no duration or travel-time reasoning, and absent bounds are treated as
//! fully flexible.

use chrono::{DateTime, Utc};

use crate::types::TimeWindow;

/// Check whether a donation's pickup availability can serve a request's
/// delivery window.
///
/// A request without a delivery window is always feasible. The effective
/// pickup interval starts at the later of `ready_after` and the pickup
/// window's start, and ends at the pickup window's end; if neither pickup
/// bound exists the donation is considered fully flexible. Overlap fails only
/// when one interval strictly precedes the other.
pub fn windows_overlap(
    pickup_window: Option<&TimeWindow>,
    ready_after: Option<DateTime<Utc>>,
    delivery_window: Option<&TimeWindow>,
) -> bool {
    let Some(delivery) = delivery_window else {
        return true;
    };

    let mut pickup_start = ready_after;
    let mut pickup_end = None;
    if let Some(window) = pickup_window {
        if let Some(start) = window.start {
            if pickup_start.map_or(true, |current| start > current) {
                pickup_start = Some(start);
            }
        }
        pickup_end = window.end;
    }

    if pickup_start.is_none() && pickup_end.is_none() {
        return true;
    }

    if let (Some(ps), Some(de)) = (pickup_start, delivery.end) {
        if ps > de {
            return false;
        }
    }
    if let (Some(ds), Some(pe)) = (delivery.start, pickup_end) {
        if ds > pe {
            return false;
        }
    }
    true
}

// ============================================================================
// Unit Tests
// ============================================================================
