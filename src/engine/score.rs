//! Multi-factor compatibility scoring between one donation and one request
//! for a single item label.
//!
//! ## Terms
//!
//! | Term     | Weight | Meaning                                         |
//! |----------|--------|-------------------------------------------------|
//! | qty fit  | 0.35   | how well offer and need quantities match        |
//! | distance | 0.30   | full credit at 0 km, fading to none at 20 km    |
//! | expiry   | 0.20   | urgency of the earliest expiring item, 72h horizon |
//! | priority | 0.15   | request urgency on a 0-5 scale                  |
//!
//! The weights are fixed constants, not per-run configuration. Donations
//! without expiry metadata receive no urgency credit at all - an intentional
//! asymmetry that prefers moving goods with a known shelf life.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::pool::canon_label;
use crate::types::Item;

/// Quantity-fit weight in the composite score.
pub const WEIGHT_QTY_FIT: f64 = 0.35;
/// Distance weight in the composite score.
pub const WEIGHT_DISTANCE: f64 = 0.30;
/// Expiry-urgency weight in the composite score.
pub const WEIGHT_EXPIRY: f64 = 0.20;
/// Priority weight in the composite score.
pub const WEIGHT_PRIORITY: f64 = 0.15;

/// Distance at which the distance term reaches zero credit.
pub const DISTANCE_FADE_KM: f64 = 20.0;
/// Hours-to-expiry beyond which urgency contributes nothing.
pub const EXPIRY_HORIZON_HOURS: f64 = 72.0;
/// Priority value that saturates the priority term.
pub const PRIORITY_SCALE: f64 = 5.0;

/// Pairwise quantity fit: `min(need, offer) / max(need, offer)`.
///
/// Symmetric, zero when either side is non-positive. Measures how well a
/// single donation's offer matches a single request's remaining need; it
/// makes no claim about a globally optimal assignment.
pub fn qty_fit_ratio(need: Decimal, offer: Decimal) -> f64 {
    if need <= Decimal::ZERO || offer <= Decimal::ZERO {
        return 0.0;
    }
    (need.min(offer) / need.max(offer)).to_f64().unwrap_or(0.0)
}

/// Hours until the earliest expiry among a donation's items under a label.
///
/// Returns `None` when no item under the label carries expiry metadata.
/// Already-expired items yield negative hours.
pub fn earliest_expiry_hours(items: &[Item], label: &str, now: DateTime<Utc>) -> Option<f64> {
    items
        .iter()
        .filter(|item| canon_label(&item.name) == label)
        .filter_map(|item| item.expiry_dt)
        .min()
        .map(|earliest| (earliest - now).num_seconds() as f64 / 3600.0)
}

/// Composite compatibility score.
///
/// Approximately bounded by `[0, 1]`: the urgency term follows the literal
/// fade formula, so an already-expired item (negative hours) pushes its term
/// above 1. Candidates scoring `<= 0` are infeasible.
pub fn compute_score(
    distance_km: f64,
    qty_fit: f64,
    hours_to_expiry: Option<f64>,
    priority: i32,
) -> f64 {
    let dist_term = (1.0 - distance_km / DISTANCE_FADE_KM).max(0.0);
    let qty_term = qty_fit.clamp(0.0, 1.0);
    let expiry_term = hours_to_expiry
        .map(|hours| (1.0 - hours.min(EXPIRY_HORIZON_HOURS) / EXPIRY_HORIZON_HOURS).max(0.0))
        .unwrap_or(0.0);
    let priority_term = (priority as f64 / PRIORITY_SCALE).clamp(0.0, 1.0);

    WEIGHT_QTY_FIT * qty_term
        + WEIGHT_DISTANCE * dist_term
        + WEIGHT_EXPIRY * expiry_term
        + WEIGHT_PRIORITY * priority_term
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn t(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339)
            .expect("timestamp")
            .with_timezone(&Utc)
    }

    #[test]
    fn test_qty_fit_ratio_symmetric() {
        let a = qty_fit_ratio(Decimal::from(6), Decimal::from(10));
        let b = qty_fit_ratio(Decimal::from(10), Decimal::from(6));
        assert!((a - 0.6).abs() < 1e-12);
        assert!((a - b).abs() < 1e-12);
    }

    #[test]
    fn test_qty_fit_ratio_zero_sides() {
        assert_eq!(qty_fit_ratio(Decimal::ZERO, Decimal::from(5)), 0.0);
        assert_eq!(qty_fit_ratio(Decimal::from(5), Decimal::ZERO), 0.0);
        assert_eq!(qty_fit_ratio(Decimal::from(-1), Decimal::from(5)), 0.0);
    }

    #[test]
    fn test_qty_fit_ratio_perfect() {
        assert!((qty_fit_ratio(Decimal::from(7), Decimal::from(7)) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_distance_term_fades_to_zero() {
        let near = compute_score(0.0, 0.0, None, 0);
        let mid = compute_score(10.0, 0.0, None, 0);
        let far = compute_score(20.0, 0.0, None, 0);
        let beyond = compute_score(35.0, 0.0, None, 0);
        assert!((near - WEIGHT_DISTANCE).abs() < 1e-12);
        assert!((mid - WEIGHT_DISTANCE * 0.5).abs() < 1e-12);
        assert_eq!(far, 0.0);
        assert_eq!(beyond, 0.0); // clamped, never negative
    }

    #[test]
    fn test_distance_monotonicity() {
        let mut previous = f64::INFINITY;
        for km in [0.0, 2.0, 5.0, 11.0, 19.0] {
            let s = compute_score(km, 0.8, None, 3);
            assert!(s < previous, "score did not decrease at {km} km");
            previous = s;
        }
    }

    #[test]
    fn test_qty_fit_monotonicity() {
        let mut previous = -1.0;
        for fit in [0.0, 0.25, 0.5, 0.75, 1.0] {
            let s = compute_score(5.0, fit, None, 3);
            assert!(s > previous, "score did not increase at fit {fit}");
            previous = s;
        }
    }

    #[test]
    fn test_expiry_urgency() {
        // no metadata: no credit at all
        assert_eq!(compute_score(20.0, 0.0, None, 0), 0.0);
        // at the horizon: still no credit
        assert_eq!(compute_score(20.0, 0.0, Some(72.0), 0), 0.0);
        // half the horizon: half credit
        let s = compute_score(20.0, 0.0, Some(36.0), 0);
        assert!((s - WEIGHT_EXPIRY * 0.5).abs() < 1e-12);
        // imminent expiry: full credit
        let s = compute_score(20.0, 0.0, Some(0.0), 0);
        assert!((s - WEIGHT_EXPIRY).abs() < 1e-12);
    }

    #[test]
    fn test_expired_item_exceeds_unit_term() {
        // the fade formula is not clamped above: -72h doubles the term
        let s = compute_score(20.0, 0.0, Some(-72.0), 0);
        assert!((s - WEIGHT_EXPIRY * 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_priority_clamps() {
        let p5 = compute_score(20.0, 0.0, None, 5);
        let p9 = compute_score(20.0, 0.0, None, 9);
        assert!((p5 - WEIGHT_PRIORITY).abs() < 1e-12);
        assert_eq!(p5, p9);
        assert_eq!(compute_score(20.0, 0.0, None, -3), 0.0);
    }

    #[test]
    fn test_reference_scenario_score() {
        // 10 kg offered against 6 kg needed at 0 km, priority 5, no expiry:
        // 0.35*0.6 + 0.30*1.0 + 0 + 0.15*1.0 = 0.66
        let fit = qty_fit_ratio(Decimal::from(6), Decimal::from(10));
        let s = compute_score(0.0, fit, None, 5);
        assert!((s - 0.66).abs() < 1e-9, "got {s}");
    }

    #[test]
    fn test_earliest_expiry_picks_minimum_for_label() {
        let now = t("2026-03-01T00:00:00Z");
        let items = vec![
            Item::new("bread", Decimal::from(2), "kg").with_expiry(t("2026-03-03T00:00:00Z")),
            Item::new("Bread", Decimal::from(1), "kg").with_expiry(t("2026-03-02T00:00:00Z")),
            Item::new("rice", Decimal::from(5), "kg").with_expiry(t("2026-03-01T06:00:00Z")),
        ];
        let hours = earliest_expiry_hours(&items, "bread", now).expect("expiry");
        assert!((hours - 24.0).abs() < 1e-9);
    }

    #[test]
    fn test_earliest_expiry_none_without_metadata() {
        let now = t("2026-03-01T00:00:00Z");
        let items = vec![Item::new("bread", Decimal::from(2), "kg")];
        assert_eq!(earliest_expiry_hours(&items, "bread", now), None);
        // metadata on a different label does not leak
        let items = vec![Item::new("rice", Decimal::from(2), "kg").with_expiry(now)];
        assert_eq!(earliest_expiry_hours(&items, "bread", now), None);
    }

    #[test]
    fn test_weights_sum_to_one() {
        let sum = WEIGHT_QTY_FIT + WEIGHT_DISTANCE + WEIGHT_EXPIRY + WEIGHT_PRIORITY;
        assert!((sum - 1.0).abs() < 1e-12);
    }
}
