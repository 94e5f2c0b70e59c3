//! Open-set snapshot and the per-run residual ledger.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::pool::residual::ResidualMap;
use crate::types::quantity::Unit;
use crate::types::{Diagnostic, Donation, Item, Request};

// ============================================================================
// OpenSet
// ============================================================================

/// The open donations and requests one matching run operates on.
///
/// A run reads this snapshot once, computes allocations entirely in memory,
/// and never re-reads mid-computation.
#[derive(Debug, Clone, Default)]
pub struct OpenSet {
    pub donations: Vec<Donation>,
    pub requests: Vec<Request>,
}

impl OpenSet {
    pub fn new(donations: Vec<Donation>, requests: Vec<Request>) -> Self {
        Self {
            donations,
            requests,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.donations.is_empty() && self.requests.is_empty()
    }
}

// ============================================================================
// ResidualLedger
// ============================================================================

/// Mutable residual state for one matching run.
///
/// The ledger is owned by the allocator for the run's lifetime: every
/// allocation immediately debits both sides so later iterations see updated
/// availability. It is never shared between runs and never persisted.
#[derive(Debug, Clone, Default)]
pub struct ResidualLedger {
    supply: BTreeMap<String, ResidualMap>,
    demand: BTreeMap<String, ResidualMap>,
}

impl ResidualLedger {
    /// Materialize residual maps for every document in the snapshot.
    ///
    /// Returns the ledger plus diagnostics for every distinct unrecognized
    /// unit string encountered (those quantities entered the ledger via the
    /// identity fallback).
    pub fn materialize(open: &OpenSet) -> (Self, Vec<Diagnostic>) {
        let mut unknown_units = BTreeSet::new();

        let supply = open
            .donations
            .iter()
            .map(|d| {
                collect_unknown_units(&d.items, &mut unknown_units);
                (d.id.clone(), ResidualMap::from_items(&d.items))
            })
            .collect();

        let demand = open
            .requests
            .iter()
            .map(|r| {
                collect_unknown_units(&r.needs, &mut unknown_units);
                (r.id.clone(), ResidualMap::from_items(&r.needs))
            })
            .collect();

        let diagnostics = unknown_units
            .into_iter()
            .map(|unit| {
                log::warn!("unrecognized unit {unit:?}: treating quantities as kg");
                Diagnostic::UnknownUnit { unit }
            })
            .collect();

        (Self { supply, demand }, diagnostics)
    }

    /// Remaining supply of a label on a donation.
    pub fn remaining_supply(&self, donation_id: &str, label: &str) -> Decimal {
        self.supply
            .get(donation_id)
            .map(|m| m.get(label))
            .unwrap_or(Decimal::ZERO)
    }

    /// Remaining need for a label on a request.
    pub fn remaining_demand(&self, request_id: &str, label: &str) -> Decimal {
        self.demand
            .get(request_id)
            .map(|m| m.get(label))
            .unwrap_or(Decimal::ZERO)
    }

    /// Total outstanding need across all labels of a request.
    pub fn total_demand(&self, request_id: &str) -> Decimal {
        self.demand
            .get(request_id)
            .map(ResidualMap::total)
            .unwrap_or(Decimal::ZERO)
    }

    /// Labels a request still needs, with their outstanding quantities.
    pub fn demand_labels(&self, request_id: &str) -> Vec<(String, Decimal)> {
        self.demand
            .get(request_id)
            .map(|m| {
                m.labels()
                    .map(|(label, qty)| (label.to_string(), qty))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Debit both sides of an allocation.
    pub fn consume(&mut self, donation_id: &str, request_id: &str, label: &str, quantity: Decimal) {
        if let Some(m) = self.supply.get_mut(donation_id) {
            m.consume(label, quantity);
        }
        if let Some(m) = self.demand.get_mut(request_id) {
            m.consume(label, quantity);
        }
    }
}

fn collect_unknown_units(items: &[Item], unknown: &mut BTreeSet<String>) {
    for item in items {
        if Unit::parse(&item.unit).is_none() {
            unknown.insert(item.unit.clone());
        }
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
