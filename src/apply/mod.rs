//! Allocation applier: persists a run's records and decrements the source
//! documents.
//!
//! ## Phases
//!
//! 1. Append every allocation record of the run in one atomic store call.
//! 2. For every distinct (donation, label) pair with a positive allocated
//!    sum, re-read the donation, subtract the canonical amount from its
//!    items (converted back into each item's original unit, walking items in
//!    stored order), flip its status, and write it back conditionally.
//! 3. Mirror the decrement for requests.
//!
//! ## Failure Semantics
//!
//! A vanished document or a twice-lost version race never aborts the run;
//! both are recorded on the apply report and as diagnostics, and the
//! allocation records stay persisted as the audit trail of what was planned.
//! Only [`StoreError::Unavailable`] propagates.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::pool::canon_label;
use crate::store::{DocumentStore, StoreError};
use crate::types::quantity::from_canonical;
use crate::types::{Allocation, ApplyReport, Diagnostic, DonationStatus, Item, RequestStatus};

/// Persist a run's allocation records and apply the resulting decrements.
pub fn apply_allocations<S: DocumentStore>(
    store: &S,
    allocations: &[Allocation],
) -> Result<(ApplyReport, Vec<Diagnostic>), StoreError> {
    let mut report = ApplyReport::default();
    let mut diagnostics = Vec::new();

    if allocations.is_empty() {
        return Ok((report, diagnostics));
    }

    store.insert_allocations(allocations)?;

    let mut donation_decrements: BTreeMap<(String, String), Decimal> = BTreeMap::new();
    let mut request_decrements: BTreeMap<(String, String), Decimal> = BTreeMap::new();
    for a in allocations {
        *donation_decrements
            .entry((a.donation_id.clone(), a.item_label.clone()))
            .or_insert(Decimal::ZERO) += a.quantity;
        *request_decrements
            .entry((a.request_id.clone(), a.item_label.clone()))
            .or_insert(Decimal::ZERO) += a.quantity;
    }

    for ((id, label), amount) in &donation_decrements {
        if *amount <= Decimal::ZERO {
            continue;
        }
        apply_donation_decrement(store, id, label, *amount, &mut report, &mut diagnostics)?;
    }
    for ((id, label), amount) in &request_decrements {
        if *amount <= Decimal::ZERO {
            continue;
        }
        apply_request_decrement(store, id, label, *amount, &mut report, &mut diagnostics)?;
    }

    Ok((report, diagnostics))
}

fn apply_donation_decrement<S: DocumentStore>(
    store: &S,
    id: &str,
    label: &str,
    amount_kg: Decimal,
    report: &mut ApplyReport,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), StoreError> {
    for attempt in 0..2 {
        let versioned = match store.get_donation(id) {
            Ok(v) => v,
            Err(StoreError::NotFound { .. }) => {
                log::warn!("donation {id} vanished before apply: decrement skipped");
                if push_unique(&mut report.skipped_missing, id) {
                    diagnostics.push(Diagnostic::VanishedDocument { id: id.to_string() });
                }
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let mut doc = versioned.doc;
        let absorbed = decrement_items(&mut doc.items, label, amount_kg);
        if absorbed <= Decimal::ZERO {
            return Ok(());
        }
        doc.status = if doc.is_depleted() {
            DonationStatus::Closed
        } else {
            DonationStatus::Matched
        };

        match store.update_donation(versioned.version, &doc) {
            Ok(_) => {
                push_unique(&mut report.donations_updated, id);
                return Ok(());
            }
            Err(StoreError::VersionConflict { .. }) if attempt == 0 => {
                log::debug!("donation {id} moved during apply: retrying decrement");
            }
            Err(StoreError::VersionConflict { .. }) => {
                log::warn!("donation {id} decrement lost the version race twice");
                if push_unique(&mut report.conflicts, id) {
                    diagnostics.push(Diagnostic::ApplyConflict { id: id.to_string() });
                }
                return Ok(());
            }
            Err(StoreError::NotFound { .. }) => {
                if push_unique(&mut report.skipped_missing, id) {
                    diagnostics.push(Diagnostic::VanishedDocument { id: id.to_string() });
                }
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

fn apply_request_decrement<S: DocumentStore>(
    store: &S,
    id: &str,
    label: &str,
    amount_kg: Decimal,
    report: &mut ApplyReport,
    diagnostics: &mut Vec<Diagnostic>,
) -> Result<(), StoreError> {
    for attempt in 0..2 {
        let versioned = match store.get_request(id) {
            Ok(v) => v,
            Err(StoreError::NotFound { .. }) => {
                log::warn!("request {id} vanished before apply: decrement skipped");
                if push_unique(&mut report.skipped_missing, id) {
                    diagnostics.push(Diagnostic::VanishedDocument { id: id.to_string() });
                }
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        let mut doc = versioned.doc;
        let absorbed = decrement_items(&mut doc.needs, label, amount_kg);
        if absorbed <= Decimal::ZERO {
            return Ok(());
        }
        doc.status = RequestStatus::Matched;

        match store.update_request(versioned.version, &doc) {
            Ok(_) => {
                push_unique(&mut report.requests_updated, id);
                return Ok(());
            }
            Err(StoreError::VersionConflict { .. }) if attempt == 0 => {
                log::debug!("request {id} moved during apply: retrying decrement");
            }
            Err(StoreError::VersionConflict { .. }) => {
                log::warn!("request {id} decrement lost the version race twice");
                if push_unique(&mut report.conflicts, id) {
                    diagnostics.push(Diagnostic::ApplyConflict { id: id.to_string() });
                }
                return Ok(());
            }
            Err(StoreError::NotFound { .. }) => {
                if push_unique(&mut report.skipped_missing, id) {
                    diagnostics.push(Diagnostic::VanishedDocument { id: id.to_string() });
                }
                return Ok(());
            }
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

/// Subtract a canonical amount from the items matching a label, walking items
/// in stored order until the amount is absorbed or items are exhausted.
///
/// The subtraction is converted back into each item's original unit.
/// Quantities never go negative, even when pound back-conversion rounds.
/// Returns the canonical amount actually absorbed.
fn decrement_items(items: &mut [Item], label: &str, amount_kg: Decimal) -> Decimal {
    let mut remaining = amount_kg;
    let mut absorbed = Decimal::ZERO;

    for item in items.iter_mut() {
        if remaining <= Decimal::ZERO {
            break;
        }
        if canon_label(&item.name) != label {
            continue;
        }
        let item_kg = item.quantity_kg();
        let take = item_kg.min(remaining);
        if take <= Decimal::ZERO {
            continue;
        }
        item.quantity = (item.quantity - from_canonical(take, &item.unit)).max(Decimal::ZERO);
        remaining -= take;
        absorbed += take;
    }

    absorbed
}

fn push_unique(list: &mut Vec<String>, id: &str) -> bool {
    if list.iter().any(|existing| existing == id) {
        return false;
    }
    list.push(id.to_string());
    true
}

// ============================================================================
// Unit Tests
// ============================================================================
