//! Unit conversions shared by the coordinate engine and the world step.

/// Metres in one international nautical mile.
pub const NM_TO_M: f64 = 1_852.0;

/// Metres in one foot.
pub const FT_TO_M: f64 = 0.3048;

/// Metres per second in one knot.
pub const KT_TO_MPS: f64 = NM_TO_M / 3_600.0;

/// Wrap an angle in degrees into `[0, 360)`.
#[inline]
pub fn normalize_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Convert an aeronautical azimuth (clockwise from north) into a
/// mathematical angle (counter-clockwise from east), both in degrees.
///
/// `angle = 90° − azimuth`, wrapped into `[0, 360)`.
#[inline]
pub fn azimuth_to_angle(azimuth_deg: f64) -> f64 {
    normalize_degrees(90.0 - azimuth_deg)
}

/// Inverse of [`azimuth_to_angle`].
#[inline]
pub fn angle_to_azimuth(angle_deg: f64) -> f64 {
    normalize_degrees(90.0 - angle_deg)
}
