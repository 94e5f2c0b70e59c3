//! Document store abstraction for the matching engine.
//!
//! The engine is storage-agnostic: it needs bulk reads of the open set, an
//! atomic append for a run's allocation records, and per-document
//! compare-and-swap updates for the apply phase. Everything else about
//! persistence (indices, real transactions, replication) lives outside this
//! crate.
//!
//! ## Versioning
//!
//! Every read hands back a monotonically increasing per-document version.
//! Apply-phase writes pass the version they read; a mismatch means another
//! writer (a second engine instance, a delivery-status update) got there
//! first and the write is refused with [`StoreError::VersionConflict`].

pub mod memory;

use thiserror::Error;

use crate::types::{Allocation, Donation, Request};

/// Per-document optimistic concurrency token.
pub type Version = u64;

/// A document together with the version it was read at.
#[derive(Debug, Clone, PartialEq)]
pub struct Versioned<T> {
    pub version: Version,
    pub doc: T,
}

/// Document store failure taxonomy.
#[derive(Error, Debug)]
pub enum StoreError {
    /// The referenced document does not exist (any more).
    #[error("document {id} not found")]
    NotFound { id: String },

    /// A conditional write lost its race: the document moved past the
    /// expected version.
    #[error("version conflict on document {id}: expected {expected}, found {found}")]
    VersionConflict {
        id: String,
        expected: Version,
        found: Version,
    },

    /// The store itself failed; fatal to the run.
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// Storage operations the matching engine depends on.
pub trait DocumentStore {
    /// All donations currently in `Open` status, in a deterministic order.
    fn open_donations(&self) -> Result<Vec<Donation>, StoreError>;

    /// All requests currently in `Open` status, in a deterministic order.
    fn open_requests(&self) -> Result<Vec<Request>, StoreError>;

    /// Append a run's allocation records. All-or-nothing: on error, none of
    /// the records are visible.
    fn insert_allocations(&self, records: &[Allocation]) -> Result<(), StoreError>;

    /// Point read of a donation with its current version.
    fn get_donation(&self, id: &str) -> Result<Versioned<Donation>, StoreError>;

    /// Point read of a request with its current version.
    fn get_request(&self, id: &str) -> Result<Versioned<Request>, StoreError>;

    /// Replace a donation if its version still matches `expected`.
    /// Returns the new version.
    fn update_donation(&self, expected: Version, doc: &Donation) -> Result<Version, StoreError>;

    /// Replace a request if its version still matches `expected`.
    /// Returns the new version.
    fn update_request(&self, expected: Version, doc: &Request) -> Result<Version, StoreError>;
}

pub use memory::MemoryStore;
