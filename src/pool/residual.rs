//! Per-document residual quantity maps.
//!
//! ## Labels
//!
//! The matching key between donation items and request needs is the
//! canonicalized item name: lowercased, whitespace-trimmed. That is the only
//! identity resolution performed; there is no fuzzy matching, synonym
//! handling, or category inference.
//!
//! ## Residual Discipline
//!
//! Residuals are re-derived fresh from current item quantities at the start
//! of every run. Quantities are physically decremented by the applier after
//! each run, so no committed-allocation subtraction is needed.

use std::collections::BTreeMap;

use rust_decimal::Decimal;

use crate::types::Item;

/// Canonicalize an item name into a matching label.
///
/// # Example
///
/// ```
/// use foodbridge_engine::pool::canon_label;
///
/// assert_eq!(canon_label("  Bread "), "bread");
/// assert_eq!(canon_label("RICE"), canon_label("rice"));
/// ```
pub fn canon_label(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Remaining canonical quantity per label for one document.
///
/// Owned by the allocator for the duration of one run; never persisted. A
/// `BTreeMap` keeps label iteration deterministic.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResidualMap {
    entries: BTreeMap<String, Decimal>,
}

impl ResidualMap {
    /// Build the residual map for a document's item list.
    ///
    /// Items sharing a label are summed; quantities are converted to
    /// kilograms with the permissive unit fallback.
    pub fn from_items(items: &[Item]) -> Self {
        let mut entries = BTreeMap::new();
        for item in items {
            let label = canon_label(&item.name);
            *entries.entry(label).or_insert(Decimal::ZERO) += item.quantity_kg();
        }
        Self { entries }
    }

    /// Remaining quantity for a label, zero when absent.
    pub fn get(&self, label: &str) -> Decimal {
        self.entries.get(label).copied().unwrap_or(Decimal::ZERO)
    }

    /// Subtract an allocated quantity from a label's residual.
    pub fn consume(&mut self, label: &str, quantity: Decimal) {
        if let Some(remaining) = self.entries.get_mut(label) {
            *remaining -= quantity;
        }
    }

    /// Total remaining quantity across all labels.
    pub fn total(&self) -> Decimal {
        self.entries.values().copied().sum()
    }

    /// Labels with their remaining quantities, in label order.
    pub fn labels(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(label, qty)| (label.as_str(), *qty))
    }

    /// True when no label has positive residual.
    pub fn is_exhausted(&self) -> bool {
        self.entries.values().all(|qty| *qty <= Decimal::ZERO)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
