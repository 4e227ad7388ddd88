//! Status-tagged resolution results.
//!
//! Resolution never throws: every outcome is a [`ResolvedPosition`] whose
//! [`ResolveStatus`] tells the caller whether the position is usable.  Failed
//! resolutions carry [`GeoPoint::SENTINEL`] so a careless caller plots the
//! point at the south-west corner of the map instead of at a plausible
//! location.

use std::fmt;

use trk_core::GeoPoint;

/// Outcome class of a coordinate or fix resolution.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum ResolveStatus {
    /// The position is valid.
    Ok,
    /// The referenced fix is absent or flagged invalid.
    NotFound,
    /// The coordinate kind is unsupported (`Polar`, `Unknown`) or unrecognized.
    InvalidKind,
    /// A required field is missing or could not be parsed.
    Malformed,
}

impl fmt::Display for ResolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolveStatus::Ok          => "ok",
            ResolveStatus::NotFound    => "not found",
            ResolveStatus::InvalidKind => "invalid kind",
            ResolveStatus::Malformed   => "malformed",
        };
        f.write_str(s)
    }
}

/// A resolved geographic position plus its status.
#[derive(Copy, Clone, PartialEq, Debug)]
pub struct ResolvedPosition {
    pub status:   ResolveStatus,
    pub position: GeoPoint,
}

impl ResolvedPosition {
    #[inline]
    pub fn ok(position: GeoPoint) -> Self {
        Self { status: ResolveStatus::Ok, position }
    }

    /// A failed resolution at the sentinel position.
    ///
    /// Passing `ResolveStatus::Ok` here is a logic error; it is accepted
    /// but the position is still the sentinel.
    #[inline]
    pub fn failed(status: ResolveStatus) -> Self {
        Self { status, position: GeoPoint::SENTINEL }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        self.status == ResolveStatus::Ok
    }

    #[inline]
    pub fn lat(&self) -> f64 {
        self.position.lat
    }

    #[inline]
    pub fn lng(&self) -> f64 {
        self.position.lng
    }

    /// `Some(position)` when the status is `Ok`.
    #[inline]
    pub fn position(&self) -> Option<GeoPoint> {
        self.is_ok().then_some(self.position)
    }
}

impl From<Result<GeoPoint, ResolveStatus>> for ResolvedPosition {
    fn from(result: Result<GeoPoint, ResolveStatus>) -> Self {
        match result {
            Ok(p)       => ResolvedPosition::ok(p),
            Err(status) => ResolvedPosition::failed(status),
        }
    }
}
