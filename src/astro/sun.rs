//! # Low-precision solar position
//!
//! Geocentric apparent RA/Dec of the Sun from the truncated series of Meeus,
//! *Astronomical Algorithms* (2nd ed.), ch. 25. Accuracy is on the order of
//! 0.01°, which is three orders of magnitude below the dark-window sampling
//! resolution.

use crate::astro::RaDec;
use crate::constants::{DPI, MJD, RADEG, T2000};

/// Geocentric solar RA/Dec at a given instant.
///
/// Arguments
/// -----------------
/// * `tjm`: Modified Julian Date (UT; the TT−UT offset is negligible at this
///   precision).
///
/// Return
/// ----------
/// * Equatorial coordinates in radians, RA normalized to [0, 2π).
pub fn sun_radec(tjm: MJD) -> RaDec {
    // Julian centuries since J2000.0
    let t = (tjm - T2000) / 36525.0;

    // Geometric mean longitude and mean anomaly (degrees)
    let l0 = (280.46646 + 36000.76983 * t + 0.0003032 * t * t).rem_euclid(360.0);
    let m = (357.52911 + 35999.05029 * t - 0.0001537 * t * t).rem_euclid(360.0) * RADEG;

    // Equation of center
    let c = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin()
        + (0.019993 - 0.000101 * t) * (2.0 * m).sin()
        + 0.000289 * (3.0 * m).sin();

    // True ecliptic longitude and mean obliquity
    let lambda = (l0 + c).rem_euclid(360.0) * RADEG;
    let eps = (23.439291 - 0.0130042 * t) * RADEG;

    let ra = (eps.cos() * lambda.sin()).atan2(lambda.cos()).rem_euclid(DPI);
    let dec = (eps.sin() * lambda.sin()).asin();

    RaDec { ra, dec }
}
