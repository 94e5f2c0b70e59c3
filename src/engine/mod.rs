//! Matching engine for FoodBridge.
//!
//! ## Design Principles
//!
//! The engine is designed for:
//!
//! 1. **Determinism**: Same snapshot and `now` always produce the same
//!    allocation list (every ordering ends in an id tie-break)
//! 2. **Pure Planning**: The scoring/allocation loop runs entirely in memory
//!    over the snapshot; store I/O happens only before and after
//! 3. **Serialized Runs**: A run-level lock prevents two runs from
//!    allocating the same residual supply
//!
//! ## Matching Rules
//!
//! - Requests are served in priority order (ties: earlier delivery start,
//!   larger total need, id)
//! - Candidates must share an item label, overlap in time windows, and have
//!   coordinates on both sides
//! - Candidates are ranked by the composite score (see [`score`]); partial
//!   allocations walk down the ranking until the need is met
//!
//! ## Example
//!
//! ```
//! use foodbridge_engine::engine::plan;
//! use foodbridge_engine::pool::OpenSet;
//! use foodbridge_engine::types::{Donation, GeoPoint, Item, Request};
//! use rust_decimal::Decimal;
//! use chrono::Utc;
//!
//! let site = GeoPoint::new(52.52, 13.405);
//! let open = OpenSet::new(
//!     vec![Donation::new("d1", vec![Item::new("bread", Decimal::from(10), "kg")])
//!         .with_location(site)],
//!     vec![Request::new("r1", vec![Item::new("bread", Decimal::from(6), "kg")])
//!         .with_location(site)],
//! );
//!
//! let plan = plan(&open, Utc::now());
//! assert_eq!(plan.allocations.len(), 1);
//! assert_eq!(plan.allocations[0].quantity, Decimal::from(6));
//! ```

pub mod geo;
pub mod matcher;
pub mod runner;
pub mod score;
pub mod window;

pub use matcher::{plan, MatchPlan};
pub use runner::MatchRunner;
