//! Geographic and Cartesian point types.
//!
//! Positions use `f64` throughout: the round trip through the tangent-plane
//! projection has to reproduce inputs to 1e-6 degrees, which single precision
//! cannot hold at continental distances.

/// A WGS-84 geographic coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    /// Position reported by every failed coordinate resolution.
    pub const SENTINEL: GeoPoint = GeoPoint { lat: -90.0, lng: -180.0 };

    #[inline]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// `true` when both components lie inside their valid ranges.
    pub fn is_valid(self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }

    /// Largest absolute component difference, in degrees.
    ///
    /// Used for tolerance checks; not a distance.
    #[inline]
    pub fn max_abs_diff(self, other: GeoPoint) -> f64 {
        (self.lat - other.lat).abs().max((self.lng - other.lng).abs())
    }
}

impl std::fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lng)
    }
}

/// A point in the local Cartesian working frame, in metres.
///
/// `x` points east, `y` north and `z` up from the reference point of the
/// [`ReferenceFrame`][crate::ReferenceFrame] that produced it.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CartesianPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl CartesianPoint {
    #[inline]
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Shift the point in the horizontal plane by `distance_m` along the
    /// mathematical angle `angle_rad` (counter-clockwise from east).
    #[inline]
    pub fn offset_polar(self, distance_m: f64, angle_rad: f64) -> Self {
        Self {
            x: self.x + distance_m * angle_rad.cos(),
            y: self.y + distance_m * angle_rad.sin(),
            z: self.z,
        }
    }

    /// Horizontal distance between two points, in metres.
    #[inline]
    pub fn horizontal_distance(self, other: CartesianPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}
