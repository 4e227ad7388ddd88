//! `CoordinateEngine`: resolves any coordinate encoding to a position.
//!
//! The engine owns nothing mutable: it holds the shared reference frame and
//! fix registry behind `Arc`s and can be cloned into every worker that needs
//! to resolve coordinates.
//!
//! All per-kind handlers return `Result<GeoPoint, ResolveStatus>`; the single
//! conversion into [`ResolvedPosition`] at the end of [`CoordinateEngine::resolve`]
//! is the only place a failure turns into the sentinel position.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use trk_core::units::{NM_TO_M, azimuth_to_angle};
use trk_core::{CartesianPoint, FixId, GeoPoint, ReferenceFrame};

use crate::sexagesimal::{parse_latitude, parse_longitude};
use crate::{
    CoordinateInput, CoordinateRecord, FixRegistry, ResolveStatus, ResolvedPosition,
    normalize_indicator,
};

#[derive(Clone, Debug)]
pub struct CoordinateEngine {
    frame: Arc<ReferenceFrame>,
    fixes: Arc<FixRegistry>,
}

impl CoordinateEngine {
    pub fn new(frame: Arc<ReferenceFrame>, fixes: Arc<FixRegistry>) -> Self {
        Self { frame, fixes }
    }

    pub fn frame(&self) -> &ReferenceFrame {
        &self.frame
    }

    pub fn fixes(&self) -> &FixRegistry {
        &self.fixes
    }

    // ── Resolution ────────────────────────────────────────────────────────

    /// Resolve a typed coordinate.
    pub fn resolve(&self, input: &CoordinateInput) -> ResolvedPosition {
        let result = self.resolve_inner(input);
        if let Err(status) = result {
            debug!(kind = %input.kind(), %status, "coordinate did not resolve");
        }
        result.into()
    }

    /// Resolve a raw record.  An unrecognized kind character is logged and
    /// yields `InvalidKind`.
    pub fn resolve_record(&self, record: &CoordinateRecord) -> ResolvedPosition {
        match CoordinateInput::from_record(record) {
            Ok(input) => self.resolve(&input),
            Err(ResolveStatus::InvalidKind) => {
                warn!(kind = ?record.kind, "invalid coordinate kind");
                ResolvedPosition::failed(ResolveStatus::InvalidKind)
            }
            Err(status) => {
                debug!(kind = ?record.kind, %status, "coordinate record rejected");
                ResolvedPosition::failed(status)
            }
        }
    }

    /// Resolve a map with keys `kind`, `field_a`, and optionally `field_b`,
    /// `field_c`, `field_d`.
    ///
    /// A missing `field_a` is `Malformed`; a missing or multi-character
    /// `kind` is `InvalidKind`.
    pub fn resolve_map(&self, fields: &HashMap<String, String>) -> ResolvedPosition {
        let Some(kind) = fields.get("kind").and_then(|k| single_char(k.trim())) else {
            warn!(kind = ?fields.get("kind"), "invalid coordinate kind");
            return ResolvedPosition::failed(ResolveStatus::InvalidKind);
        };
        let Some(field_a) = fields.get("field_a") else {
            return ResolvedPosition::failed(ResolveStatus::Malformed);
        };

        self.resolve_record(&CoordinateRecord {
            kind,
            field_a: field_a.clone(),
            field_b: fields.get("field_b").cloned(),
            field_c: fields.get("field_c").cloned(),
            field_d: fields.get("field_d").cloned(),
        })
    }

    /// Resolve a batch of records in input order.
    #[cfg(not(feature = "parallel"))]
    pub fn resolve_all(&self, records: &[CoordinateRecord]) -> Vec<ResolvedPosition> {
        records.iter().map(|r| self.resolve_record(r)).collect()
    }

    /// Resolve a batch of records in input order, on Rayon's pool.
    #[cfg(feature = "parallel")]
    pub fn resolve_all(&self, records: &[CoordinateRecord]) -> Vec<ResolvedPosition> {
        use rayon::prelude::*;
        records.par_iter().map(|r| self.resolve_record(r)).collect()
    }

    // ── Projection ────────────────────────────────────────────────────────

    pub fn to_cartesian(&self, point: GeoPoint) -> CartesianPoint {
        self.frame.to_cartesian(point, 0.0)
    }

    pub fn to_geographic(&self, point: CartesianPoint) -> GeoPoint {
        self.frame.to_geographic(point).0
    }

    // ── Per-kind handlers ─────────────────────────────────────────────────

    fn resolve_inner(&self, input: &CoordinateInput) -> Result<GeoPoint, ResolveStatus> {
        match input {
            CoordinateInput::DistanceRadial { fix, distance_nm, radial_deg } => {
                self.distance_radial(*fix, *distance_nm, *radial_deg)
            }
            CoordinateInput::FixNumber { fix } => self.fixes.position_of(*fix),
            CoordinateInput::Sexagesimal { lat, lng } => {
                let lat = parse_latitude(lat).ok_or(ResolveStatus::Malformed)?;
                let lng = parse_longitude(lng).ok_or(ResolveStatus::Malformed)?;
                Ok(GeoPoint::new(lat, lng))
            }
            CoordinateInput::Indicator { indicator } => {
                let id = self
                    .fixes
                    .lookup_indicator(&normalize_indicator(indicator))
                    .ok_or(ResolveStatus::NotFound)?;
                self.fixes.position_of(id)
            }
            CoordinateInput::Decimal { lat, lng } => {
                let point = GeoPoint::new(*lat, *lng);
                if point.is_valid() { Ok(point) } else { Err(ResolveStatus::Malformed) }
            }
            CoordinateInput::Polar { .. } | CoordinateInput::Unknown => {
                Err(ResolveStatus::InvalidKind)
            }
        }
    }

    fn distance_radial(
        &self,
        fix: FixId,
        distance_nm: f64,
        radial_deg: f64,
    ) -> Result<GeoPoint, ResolveStatus> {
        let origin = self.fixes.position_of(fix)?;
        let angle = azimuth_to_angle(radial_deg).to_radians();
        let moved = self.to_cartesian(origin).offset_polar(distance_nm * NM_TO_M, angle);
        Ok(self.frame.ground_point(moved.x, moved.y))
    }
}

fn single_char(text: &str) -> Option<char> {
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Some(c),
        _ => None,
    }
}
