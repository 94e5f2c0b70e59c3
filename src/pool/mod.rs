//! Open-set snapshot and residual accounting for one matching run.
//!
//! ## Components
//!
//! - [`OpenSet`]: the open donations and requests a run operates on
//! - [`ResidualMap`]: per-document `label -> remaining kg` map
//! - [`ResidualLedger`]: both sides' residual maps, owned by the allocator
//!   for the run's lifetime
//!
//! The ledger is transient state: materialized fresh from current item
//! quantities at the start of each run, mutated in memory as allocations are
//! emitted, and dropped when the run completes.

pub mod residual;
pub mod snapshot;

pub use residual::{canon_label, ResidualMap};
pub use snapshot::{OpenSet, ResidualLedger};
