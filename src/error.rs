//! Crate error taxonomy.
//!
//! Infeasible candidates, unknown units, and vanished documents are not
//! errors; they surface as [`Diagnostic`](crate::types::Diagnostic) values on
//! the run result. Only failures that abort a whole run appear here.

use thiserror::Error;

use crate::store::StoreError;

/// Fatal matching-run failure.
///
/// A run that returns an error has persisted no allocation records unless the
/// failure occurred during the apply phase, in which case the records of this
/// run are already durable and the apply report describes how far the
/// decrements got.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The backing document store failed mid-run.
    #[error(transparent)]
    Store(#[from] StoreError),
}
