//! `trk-coords`: fix registry and coordinate resolution.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`fix`]         | `Fix`, `FixRegistry`, `FixRegistryBuilder`                 |
//! | [`input`]       | `CoordKind`, `CoordinateRecord`, `CoordinateInput`         |
//! | [`resolved`]    | `ResolveStatus`, `ResolvedPosition`                        |
//! | [`sexagesimal`] | `parse_sexagesimal` (`DDDMM.mmmH`)                         |
//! | [`engine`]      | `CoordinateEngine`                                         |
//! | [`loader`]      | `load_fixes_csv`, `load_fixes_reader`                      |
//! | [`error`]       | `CoordsError`, `CoordsResult<T>`                           |
//!
//! # Resolution pipeline
//!
//! ```text
//! CoordinateRecord ─► CoordinateInput ─► CoordinateEngine::resolve ─► ResolvedPosition
//!   (kind char,         (typed variant)     (fix lookup, projection,     (status + lat/lng,
//!    fields A–D)                              offset, parsing)             sentinel on failure)
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | `CoordinateEngine::resolve_all` runs on Rayon.          |

pub mod engine;
pub mod error;
pub mod fix;
pub mod input;
pub mod loader;
pub mod resolved;
pub mod sexagesimal;


pub use engine::CoordinateEngine;
pub use error::{CoordsError, CoordsResult};
pub use fix::{Fix, FixRegistry, FixRegistryBuilder, normalize_indicator};
pub use input::{CoordKind, CoordinateInput, CoordinateRecord};
pub use loader::{load_fixes_csv, load_fixes_reader};
pub use resolved::{ResolveStatus, ResolvedPosition};
pub use sexagesimal::parse_sexagesimal;
