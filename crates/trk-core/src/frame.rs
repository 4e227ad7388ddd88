//! Geodetic reference frame and the local tangent-plane projection.
//!
//! # Projection
//!
//! The working frame is a WGS-84 **East-North-Up** tangent plane touching the
//! ellipsoid at the reference point:
//!
//! ```text
//! forward:  (lat, lng, alt) ─► ECEF ─► rotate/translate ─► (x east, y north, z up)
//! inverse:  (x, y, z)       ─► ECEF ─► iterative geodetic latitude ─► (lat, lng, alt)
//! ```
//!
//! Both directions are exact up to floating-point rounding, so a round trip
//! reproduces the input to well below 1e-9 degrees anywhere off the poles.
//! Distances measured in the plane are true metres near the reference point
//! and drift slowly with range (≈ 0.1 % at 300 km), which is the accepted
//! trade-off for a flat working frame.
//!
//! Horizontal arithmetic (offsets along a radial) happens in `(x, y)` only.
//! [`ReferenceFrame::ground_point`] maps a plane position back to the
//! ground-level geographic point with the same `(x, y)`, so an offset
//! survives the trip back regardless of how far the plane has left the
//! ellipsoid.
//!
//! # Immutability
//!
//! A `ReferenceFrame` is created once at simulation start and never modified:
//! all fields are private and there are no setters.  Share it as
//! `Arc<ReferenceFrame>`.

use crate::{CartesianPoint, CoreError, CoreResult, GeoPoint};

/// WGS-84 semi-major axis, metres.
const WGS84_A: f64 = 6_378_137.0;

/// WGS-84 flattening.
const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// First eccentricity squared, `f · (2 − f)`.
const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

/// Latitude convergence threshold for the inverse projection, radians.
const LAT_EPSILON: f64 = 1e-13;

const MAX_ITERATIONS: usize = 25;

/// Altitude tolerance when lowering a plane point onto the ellipsoid, metres.
const GROUND_EPSILON_M: f64 = 1e-6;

/// The geodetic origin and magnetic declination of the simulation.
#[derive(Clone, Debug)]
pub struct ReferenceFrame {
    ref_lat:     f64,
    ref_lng:     f64,
    declination: f64,

    // ── Cached projection terms ───────────────────────────────────────────
    sin_lat:    f64,
    cos_lat:    f64,
    sin_lng:    f64,
    cos_lng:    f64,
    origin:     [f64; 3],
}

impl ReferenceFrame {
    /// Build a frame centred on `(ref_lat, ref_lng)` degrees with the given
    /// magnetic declination (degrees, east positive).
    pub fn new(ref_lat: f64, ref_lng: f64, declination: f64) -> CoreResult<Self> {
        if !(-90.0..=90.0).contains(&ref_lat) {
            return Err(CoreError::LatitudeOutOfRange(ref_lat));
        }
        if !(-180.0..=180.0).contains(&ref_lng) {
            return Err(CoreError::LongitudeOutOfRange(ref_lng));
        }

        let (sin_lat, cos_lat) = ref_lat.to_radians().sin_cos();
        let (sin_lng, cos_lng) = ref_lng.to_radians().sin_cos();

        Ok(Self {
            ref_lat,
            ref_lng,
            declination,
            sin_lat,
            cos_lat,
            sin_lng,
            cos_lng,
            origin: geodetic_to_ecef(ref_lat, ref_lng, 0.0),
        })
    }

    #[inline]
    pub fn ref_lat(&self) -> f64 {
        self.ref_lat
    }

    #[inline]
    pub fn ref_lng(&self) -> f64 {
        self.ref_lng
    }

    #[inline]
    pub fn magnetic_declination(&self) -> f64 {
        self.declination
    }

    /// The reference point itself.
    #[inline]
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new(self.ref_lat, self.ref_lng)
    }

    // ── Projection ────────────────────────────────────────────────────────

    /// Project a geographic position (with altitude in metres) into the
    /// local working frame.
    pub fn to_cartesian(&self, point: GeoPoint, alt_m: f64) -> CartesianPoint {
        let [x, y, z] = geodetic_to_ecef(point.lat, point.lng, alt_m);
        let dx = x - self.origin[0];
        let dy = y - self.origin[1];
        let dz = z - self.origin[2];

        CartesianPoint {
            x: -self.sin_lng * dx + self.cos_lng * dy,
            y: -self.sin_lat * self.cos_lng * dx - self.sin_lat * self.sin_lng * dy
                + self.cos_lat * dz,
            z: self.cos_lat * self.cos_lng * dx + self.cos_lat * self.sin_lng * dy
                + self.sin_lat * dz,
        }
    }

    /// Inverse of [`to_cartesian`][Self::to_cartesian]: returns the
    /// geographic position and its altitude in metres.
    pub fn to_geographic(&self, p: CartesianPoint) -> (GeoPoint, f64) {
        let dx = -self.sin_lng * p.x - self.sin_lat * self.cos_lng * p.y
            + self.cos_lat * self.cos_lng * p.z;
        let dy = self.cos_lng * p.x - self.sin_lat * self.sin_lng * p.y
            + self.cos_lat * self.sin_lng * p.z;
        let dz = self.cos_lat * p.y + self.sin_lat * p.z;

        ecef_to_geodetic([
            self.origin[0] + dx,
            self.origin[1] + dy,
            self.origin[2] + dz,
        ])
    }

    /// Ground-level (altitude 0) position whose plane coordinates are
    /// `(x, y)`.
    ///
    /// Walks `z` down until the point meets the ellipsoid.  Each step removes
    /// all but `1 − cos φ` of the remaining height, `φ` being the angle
    /// between the local vertical and the frame's up axis, so a few steps
    /// suffice for points hundreds of kilometres out.
    pub fn ground_point(&self, x: f64, y: f64) -> GeoPoint {
        let mut z = 0.0;
        let mut point = self.origin();
        for _ in 0..MAX_ITERATIONS {
            let (geo, alt) = self.to_geographic(CartesianPoint { x, y, z });
            point = geo;
            if alt.abs() < GROUND_EPSILON_M {
                break;
            }
            z -= alt;
        }
        point
    }
}

// ── ECEF helpers ──────────────────────────────────────────────────────────────

/// Prime-vertical radius of curvature at geodetic latitude with sine `sin_lat`.
#[inline]
fn prime_vertical_radius(sin_lat: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * sin_lat * sin_lat).sqrt()
}

fn geodetic_to_ecef(lat_deg: f64, lng_deg: f64, alt_m: f64) -> [f64; 3] {
    let (sin_lat, cos_lat) = lat_deg.to_radians().sin_cos();
    let (sin_lng, cos_lng) = lng_deg.to_radians().sin_cos();
    let n = prime_vertical_radius(sin_lat);

    [
        (n + alt_m) * cos_lat * cos_lng,
        (n + alt_m) * cos_lat * sin_lng,
        (n * (1.0 - WGS84_E2) + alt_m) * sin_lat,
    ]
}

/// Fixed-point iteration on geodetic latitude.  Converges in 3–5 steps for
/// any point within a few hundred kilometres of the ellipsoid surface.
fn ecef_to_geodetic([x, y, z]: [f64; 3]) -> (GeoPoint, f64) {
    let lng = y.atan2(x);
    let p = x.hypot(y);

    let mut lat = z.atan2(p * (1.0 - WGS84_E2));
    let mut alt = 0.0;

    for _ in 0..MAX_ITERATIONS {
        let (sin_lat, cos_lat) = lat.sin_cos();
        let n = prime_vertical_radius(sin_lat);

        // Near the poles cos(lat) → 0; derive altitude from z instead.
        alt = if cos_lat.abs() > 1e-10 {
            p / cos_lat - n
        } else {
            z / sin_lat - n * (1.0 - WGS84_E2)
        };

        let next = z.atan2(p * (1.0 - WGS84_E2 * n / (n + alt)));
        let done = (next - lat).abs() < LAT_EPSILON;
        lat = next;
        if done {
            break;
        }
    }

    (GeoPoint::new(lat.to_degrees(), lng.to_degrees()), alt)
}
