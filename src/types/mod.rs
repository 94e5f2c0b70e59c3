//! Core data types for the FoodBridge matching engine.
//!
//! All documents carry serde derives; loosely-keyed intake shapes (`qty`
//! aliases, missing units, null quantities) are normalized here at the
//! deserialization boundary so the engine only sees well-typed input.
//!
//! ## Types
//!
//! - [`Donation`] / [`Request`]: the supply and demand documents
//! - [`Item`]: one itemized line of either document
//! - [`Allocation`]: an immutable record of quantity moved between the two
//! - [`MatchRunResult`] / [`RunSummary`] / [`Diagnostic`]: run output
//! - [`RunReceipt`]: deterministic run fingerprint
//!
//! ## Quantities
//!
//! Canonical quantities are kilograms held as `rust_decimal::Decimal`;
//! see [`quantity`] for the unit normalizer.

mod allocation;
mod donation;
mod item;
mod receipt;
mod request;
mod run;
pub mod quantity;

// Re-export all types at module level
pub use allocation::Allocation;
pub use donation::{Donation, DonationStatus};
pub use item::{GeoPoint, Item, TimeWindow};
pub use receipt::RunReceipt;
pub use request::{Request, RequestStatus};
pub use run::{
    totals_by_category, totals_by_item, ApplyReport, Diagnostic, MatchRunResult, RunSummary,
};
