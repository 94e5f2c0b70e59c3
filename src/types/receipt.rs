//! Run receipt: a deterministic fingerprint of one matching run.
//!
//! The receipt summarizes a run and carries a SHA-256 digest of its
//! allocation list. Two runs over identical inputs (including the supplied
//! `now`) produce byte-identical digests, which is how the determinism
//! property is asserted at stress scale.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::types::Allocation;

/// Summary receipt for one matching run.
///
/// ## Digest
///
/// The 32-byte digest is a SHA-256 hash over a canonical byte encoding of the
/// run's allocation list: every field of every record in emission order,
/// fields separated by NUL bytes, floats encoded as IEEE-754 bit patterns.
/// The encoding is infallible and stable across platforms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReceipt {
    /// Number of allocation records the run produced
    pub allocations: u64,

    /// Distinct donations referenced by those records
    pub donations_touched: u64,

    /// Distinct requests referenced by those records
    pub requests_touched: u64,

    /// SHA-256 digest of the canonical allocation encoding
    pub digest: [u8; 32],

    /// Run timestamp (the caller-supplied `now`)
    pub created_at: DateTime<Utc>,
}

impl RunReceipt {
    /// Build the receipt for a run's allocation list.
    pub fn for_allocations(allocations: &[Allocation], created_at: DateTime<Utc>) -> Self {
        let mut donations = std::collections::BTreeSet::new();
        let mut requests = std::collections::BTreeSet::new();
        for a in allocations {
            donations.insert(a.donation_id.as_str());
            requests.insert(a.request_id.as_str());
        }

        Self {
            allocations: allocations.len() as u64,
            donations_touched: donations.len() as u64,
            requests_touched: requests.len() as u64,
            digest: Self::compute_digest(allocations),
            created_at,
        }
    }

    /// Compute the canonical digest of an allocation list.
    pub fn compute_digest(allocations: &[Allocation]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        for a in allocations {
            hasher.update(a.donation_id.as_bytes());
            hasher.update([0u8]);
            hasher.update(a.request_id.as_bytes());
            hasher.update([0u8]);
            hasher.update(a.item_label.as_bytes());
            hasher.update([0u8]);
            hasher.update(a.category.as_deref().unwrap_or("").as_bytes());
            hasher.update([0u8]);
            hasher.update(a.quantity.to_string().as_bytes());
            hasher.update([0u8]);
            hasher.update(a.unit.as_bytes());
            hasher.update([0u8]);
            hasher.update(a.distance_km.to_bits().to_le_bytes());
            hasher.update(a.score.to_bits().to_le_bytes());
            hasher.update(a.created_at.timestamp_micros().to_le_bytes());
        }

        let mut digest = [0u8; 32];
        digest.copy_from_slice(&hasher.finalize());
        digest
    }

    /// Hex rendering of the digest.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest)
    }

    /// Short run identifier derived from the digest, e.g. `run-90b219465efb`.
    pub fn run_id(&self) -> String {
        format!("run-{}", &self.digest_hex()[..12])
    }

    /// True when the run allocated nothing.
    pub fn is_empty(&self) -> bool {
        self.allocations == 0
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
