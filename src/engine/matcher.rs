//! Greedy allocation of donation supply to request demand.
//!
//! ## Algorithm
//!
//! 1. Order requests by `(priority desc, delivery start asc, total need
//!    desc, id asc)`.
//! 2. For each request and each label with outstanding need, collect every
//!    donation with positive residual for that label that passes the
//!    time-window filter and has coordinates, score it, and drop
//!    non-positive scores.
//! 3. Rank candidates by score (ties broken by donation id) and walk them,
//!    taking `min(remaining need, candidate residual)` from each and
//!    debiting the residual ledger immediately, until the need is met or
//!    candidates run out.
//!
//! Unmet demand is not an error; it simply produces fewer allocation
//! records. The whole computation is pure in-memory work over the snapshot -
//! no store I/O happens here.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::engine::geo::haversine_km;
use crate::engine::score::{compute_score, earliest_expiry_hours, qty_fit_ratio};
use crate::engine::window::windows_overlap;
use crate::pool::{canon_label, OpenSet, ResidualLedger};
use crate::types::{Allocation, Diagnostic, Donation, GeoPoint, Request};

/// Output of the planning phase: allocation records in emission order plus
/// the diagnostics gathered along the way.
#[derive(Debug, Clone, Default)]
pub struct MatchPlan {
    pub allocations: Vec<Allocation>,
    pub diagnostics: Vec<Diagnostic>,
}

/// One scored donation candidate for a (request, label) pair.
#[derive(Debug, Clone)]
struct Candidate {
    /// Index into the open set's donation list
    index: usize,
    score: f64,
    distance_km: f64,
    offer_kg: Decimal,
}

/// Compute the full allocation plan for an open-set snapshot.
///
/// Deterministic for identical inputs: request ordering and candidate
/// ranking both end in an id tie-break, so the emitted allocation list does
/// not depend on the snapshot's storage order.
pub fn plan(open: &OpenSet, now: DateTime<Utc>) -> MatchPlan {
    let (mut ledger, mut diagnostics) = ResidualLedger::materialize(open);

    for donation in &open.donations {
        if donation.location.is_none() && donation.total_quantity_kg() > Decimal::ZERO {
            log::warn!("donation {} has no coordinates: excluded from matching", donation.id);
            diagnostics.push(Diagnostic::MissingCoordinates {
                id: donation.id.clone(),
            });
        }
    }
    for request in &open.requests {
        if request.location.is_none() && request.total_need_kg() > Decimal::ZERO {
            log::warn!("request {} has no coordinates: excluded from matching", request.id);
            diagnostics.push(Diagnostic::MissingCoordinates {
                id: request.id.clone(),
            });
        }
    }

    let mut ordered: Vec<&Request> = open.requests.iter().collect();
    ordered.sort_by(|a, b| request_order(a, b, &ledger));

    let mut allocations = Vec::new();

    for request in ordered {
        let Some(request_loc) = request.location else {
            continue;
        };

        for (label, need) in ledger.demand_labels(&request.id) {
            if need <= Decimal::ZERO {
                continue;
            }

            let mut candidates =
                collect_candidates(open, &ledger, request, request_loc, &label, need, now);
            if candidates.is_empty() {
                continue;
            }
            candidates.sort_by(|x, y| rank(x, y, open));

            let mut remaining_need = need;
            for candidate in candidates {
                if remaining_need <= Decimal::ZERO {
                    break;
                }
                let take = remaining_need.min(candidate.offer_kg);
                if take <= Decimal::ZERO {
                    continue;
                }

                let donation = &open.donations[candidate.index];
                allocations.push(
                    Allocation::new(
                        &donation.id,
                        &request.id,
                        &label,
                        take,
                        candidate.distance_km,
                        candidate.score,
                        now,
                    )
                    .with_category(category_for(donation, &label)),
                );
                ledger.consume(&donation.id, &request.id, &label, take);
                remaining_need -= take;
            }
        }
    }

    MatchPlan {
        allocations,
        diagnostics,
    }
}

/// Request processing order: higher priority first, then earlier required
/// delivery start, then larger total need, then id.
fn request_order(a: &Request, b: &Request, ledger: &ResidualLedger) -> Ordering {
    b.priority
        .cmp(&a.priority)
        .then_with(|| delivery_start(a).cmp(&delivery_start(b)))
        .then_with(|| ledger.total_demand(&b.id).cmp(&ledger.total_demand(&a.id)))
        .then_with(|| a.id.cmp(&b.id))
}

fn delivery_start(request: &Request) -> DateTime<Utc> {
    request
        .delivery_window
        .and_then(|w| w.start)
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Candidate ranking: score descending, donation id ascending on ties.
fn rank(x: &Candidate, y: &Candidate, open: &OpenSet) -> Ordering {
    y.score
        .partial_cmp(&x.score)
        .unwrap_or(Ordering::Equal)
        .then_with(|| open.donations[x.index].id.cmp(&open.donations[y.index].id))
}

fn collect_candidates(
    open: &OpenSet,
    ledger: &ResidualLedger,
    request: &Request,
    request_loc: GeoPoint,
    label: &str,
    need: Decimal,
    now: DateTime<Utc>,
) -> Vec<Candidate> {
    let mut candidates = Vec::new();
    for (index, donation) in open.donations.iter().enumerate() {
        let offer = ledger.remaining_supply(&donation.id, label);
        if offer <= Decimal::ZERO {
            continue;
        }
        if !windows_overlap(
            donation.pickup_window.as_ref(),
            donation.ready_after,
            request.delivery_window.as_ref(),
        ) {
            continue;
        }
        let Some(donation_loc) = donation.location else {
            continue;
        };

        let distance_km = haversine_km(request_loc, donation_loc);
        let fit = qty_fit_ratio(need, offer);
        let hours = earliest_expiry_hours(&donation.items, label, now);
        let score = compute_score(distance_km, fit, hours, request.priority);
        if score > 0.0 {
            candidates.push(Candidate {
                index,
                score,
                distance_km,
                offer_kg: offer,
            });
        }
    }
    candidates
}

/// Category hint for an allocation: the first item under the label that
/// carries one.
fn category_for(donation: &Donation, label: &str) -> Option<String> {
    donation
        .items
        .iter()
        .find(|item| canon_label(&item.name) == label && item.category.is_some())
        .and_then(|item| item.category.clone())
}

// ============================================================================
// Unit Tests
// ============================================================================
