//! Run orchestration: serialized end-to-end matching runs.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};

use crate::apply::apply_allocations;
use crate::engine::matcher::{plan, MatchPlan};
use crate::error::EngineError;
use crate::pool::OpenSet;
use crate::store::DocumentStore;
use crate::types::{totals_by_category, totals_by_item, MatchRunResult, RunReceipt, RunSummary};

/// Executes matching runs against a document store.
///
/// ## Run Serialization
///
/// Two concurrent runs reading overlapping open-set snapshots would both
/// allocate from the same residual supply and double-spend it. The runner
/// holds a run-level mutex for the whole read-plan-apply cycle, so runs
/// sharing a runner execute strictly one after another. The apply phase
/// additionally writes with per-document version checks, which protects
/// against writers outside this runner (e.g. delivery-status updates).
///
/// ## Example
///
/// ```
/// use foodbridge_engine::{Donation, Item, MatchRunner, MemoryStore, Request, GeoPoint};
/// use rust_decimal::Decimal;
/// use chrono::Utc;
///
/// let store = MemoryStore::new();
/// let site = GeoPoint::new(52.52, 13.405);
/// store.put_donation(
///     Donation::new("d1", vec![Item::new("bread", Decimal::from(10), "kg")])
///         .with_location(site),
/// ).unwrap();
/// store.put_request(
///     Request::new("r1", vec![Item::new("bread", Decimal::from(6), "kg")])
///         .with_location(site)
///         .with_priority(5),
/// ).unwrap();
///
/// let runner = MatchRunner::new();
/// let result = runner.run(&store, Utc::now()).unwrap();
/// assert_eq!(result.summary.allocations, 1);
/// ```
#[derive(Debug, Default)]
pub struct MatchRunner {
    run_lock: Mutex<()>,
}

impl MatchRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Execute one matching run: snapshot the open set, plan allocations in
    /// memory, persist and apply them, and assemble the run result.
    ///
    /// `now` drives expiry-urgency scoring and stamps the emitted records;
    /// callers supply it explicitly so runs are deterministic and testable.
    pub fn run<S: DocumentStore>(
        &self,
        store: &S,
        now: DateTime<Utc>,
    ) -> Result<MatchRunResult, EngineError> {
        // A poisoned lock only means a previous run panicked mid-flight;
        // the guard itself carries no state worth rejecting the run over.
        let _guard = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);

        let open = OpenSet::new(store.open_donations()?, store.open_requests()?);
        log::debug!(
            "matching run over {} open donations, {} open requests",
            open.donations.len(),
            open.requests.len()
        );

        let MatchPlan {
            allocations,
            mut diagnostics,
        } = plan(&open, now);

        let (apply, apply_diagnostics) = apply_allocations(store, &allocations)?;
        diagnostics.extend(apply_diagnostics);

        let receipt = RunReceipt::for_allocations(&allocations, now);
        let summary = RunSummary {
            donations_touched: receipt.donations_touched,
            requests_touched: receipt.requests_touched,
            allocations: receipt.allocations,
        };
        log::info!(
            "matching run {} allocated {} records across {} donations / {} requests",
            receipt.run_id(),
            summary.allocations,
            summary.donations_touched,
            summary.requests_touched
        );

        Ok(MatchRunResult {
            run_id: receipt.run_id(),
            created_at: now,
            totals_by_item: totals_by_item(&allocations),
            totals_by_category: totals_by_category(&allocations),
            allocations,
            summary,
            diagnostics,
            apply,
            receipt,
        })
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
