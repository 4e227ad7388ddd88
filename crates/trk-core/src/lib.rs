//! `trk-core`: foundational types for the ptracks control core.
//!
//! This crate is a dependency of every other `trk-*` crate.  It has no
//! `trk-*` dependencies and a single external one (`thiserror`, plus optional
//! `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                                  |
//! |-------------|-----------------------------------------------------------|
//! | [`ids`]     | `FixId`, `Rank`                                           |
//! | [`geo`]     | `GeoPoint`, `CartesianPoint`                              |
//! | [`frame`]   | `ReferenceFrame` and its local tangent-plane projection   |
//! | [`units`]   | Unit conversions, azimuth ↔ mathematical angle            |
//! | [`time`]    | `Tick`, `TimeOfDay`, `SimClock`                           |
//! | [`error`]   | `CoreError`, `CoreResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to plain value types.       |

pub mod error;
pub mod frame;
pub mod geo;
pub mod ids;
pub mod time;
pub mod units;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use frame::ReferenceFrame;
pub use geo::{CartesianPoint, GeoPoint};
pub use ids::{FixId, Rank};
pub use time::{SimClock, Tick, TimeOfDay};
