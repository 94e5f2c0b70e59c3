//! Run results: allocation totals, summary counts, and diagnostics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{Allocation, RunReceipt};

// ============================================================================
// Diagnostics
// ============================================================================

/// Observable form of the engine's permissive fallbacks.
///
/// None of these abort a run. They exist so callers and tests can see that a
/// fallback path fired without changing the default silent behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// An item carried a unit outside the recognized set; its quantity was
    /// treated as already-canonical.
    UnknownUnit { unit: String },

    /// A donation or request with outstanding quantity has no coordinates
    /// and was excluded from matching entirely.
    MissingCoordinates { id: String },

    /// A document referenced by an allocation vanished between planning and
    /// apply; the record persists, the decrement was skipped.
    VanishedDocument { id: String },

    /// A document decrement lost its compare-and-swap race twice and was
    /// left unapplied.
    ApplyConflict { id: String },
}

// ============================================================================
// Apply report
// ============================================================================

/// Outcome of the apply phase: which documents were mutated and which
/// decrements could not be applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplyReport {
    /// Donations whose items were decremented (status flipped on change)
    pub donations_updated: Vec<String>,

    /// Requests whose needs were decremented (status flipped on change)
    pub requests_updated: Vec<String>,

    /// Documents that vanished between planning and apply
    pub skipped_missing: Vec<String>,

    /// Documents whose decrement lost the version race twice
    pub conflicts: Vec<String>,
}

impl ApplyReport {
    /// True when every planned decrement was applied.
    pub fn is_clean(&self) -> bool {
        self.skipped_missing.is_empty() && self.conflicts.is_empty()
    }
}

// ============================================================================
// Run summary & result
// ============================================================================

/// Touched-entity counts for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub donations_touched: u64,
    pub requests_touched: u64,
    pub allocations: u64,
}

/// Everything one matching run produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRunResult {
    /// Digest-derived identifier, e.g. `run-90b219465efb`
    pub run_id: String,

    /// The caller-supplied `now` for this run
    pub created_at: DateTime<Utc>,

    /// Allocation records in emission order
    pub allocations: Vec<Allocation>,

    /// Total allocated kilograms per item label
    pub totals_by_item: BTreeMap<String, Decimal>,

    /// Total allocated kilograms per category, for labels that carried one
    pub totals_by_category: BTreeMap<String, Decimal>,

    pub summary: RunSummary,

    /// Fallback paths that fired during planning and apply
    pub diagnostics: Vec<Diagnostic>,

    /// Mutation outcome of the apply phase
    pub apply: ApplyReport,

    /// Deterministic fingerprint of the allocation list
    pub receipt: RunReceipt,
}

// ============================================================================
// Totals helpers
// ============================================================================

/// Sum allocated kilograms per item label.
pub fn totals_by_item(allocations: &[Allocation]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for a in allocations {
        *totals.entry(a.item_label.clone()).or_insert(Decimal::ZERO) += a.quantity;
    }
    totals
}

/// Sum allocated kilograms per category, skipping uncategorized records.
pub fn totals_by_category(allocations: &[Allocation]) -> BTreeMap<String, Decimal> {
    let mut totals = BTreeMap::new();
    for a in allocations {
        if let Some(category) = &a.category {
            *totals.entry(category.clone()).or_insert(Decimal::ZERO) += a.quantity;
        }
    }
    totals
}

// ============================================================================
// Unit Tests
// ============================================================================
