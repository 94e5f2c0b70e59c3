//! # FoodBridge Engine
//!
//! Donation/need matching and allocation engine for the FoodBridge platform.
//!
//! ## Architecture
//!
//! The engine consists of:
//! - **Types**: Core data structures (Donation, Request, Allocation, RunReceipt)
//! - **Pool**: Open-set snapshot and per-run residual ledger
//! - **Engine**: Scoring, time-window filtering, and the greedy allocator
//! - **Store**: Versioned document store abstraction with an in-memory impl
//! - **Apply**: Persistence of allocation records and unit-accurate decrements
//!
//! ## Design Principles
//!
//! 1. **Determinism**: Identical inputs (including an explicit `now`) produce
//!    identical allocation lists, verified by run receipt digests
//! 2. **Exact Quantities**: Canonical quantities use decimal arithmetic
//!    (`rust_decimal`), so residual accounting carries no float drift
//! 3. **Serialized Runs**: Matching runs take a run-level lock; apply-phase
//!    writes are versioned compare-and-swap operations
//! 4. **Permissive Fallbacks**: Unknown units and missing metadata never abort
//!    a run; they surface as diagnostics on the run result

// ============================================================================
// Module declarations
// ============================================================================

/// Core data types: Donation, Request, Allocation, RunReceipt
pub mod types;

/// Open-set snapshot and residual ledger
pub mod pool;

/// Matching engine: scoring, feasibility, greedy allocation
pub mod engine;

/// Document store abstraction and in-memory implementation
pub mod store;

/// Allocation applier: record persistence and quantity decrements
pub mod apply;

/// Crate error taxonomy
pub mod error;

// ============================================================================
// Re-exports for convenience
// ============================================================================

pub use types::{
    Allocation, ApplyReport, Diagnostic, Donation, DonationStatus, GeoPoint, Item, MatchRunResult,
    Request, RequestStatus, RunReceipt, RunSummary, TimeWindow,
};
pub use pool::{OpenSet, ResidualLedger, ResidualMap};
pub use engine::{MatchPlan, MatchRunner};
pub use store::{DocumentStore, MemoryStore, StoreError, Versioned};
pub use error::EngineError;
