//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]` where they construct core types from untrusted input.

use thiserror::Error;

/// The top-level error type for `trk-core`.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),

    #[error("invalid time of day {0:?}: expected HH:MM:SS")]
    InvalidTimeOfDay(String),

    #[error("tick interval must be positive")]
    ZeroTickInterval,
}

/// Shorthand result type for `trk-core`.
pub type CoreResult<T> = Result<T, CoreError>;
