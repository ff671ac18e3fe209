//! # Low-precision lunar position
//!
//! Geocentric RA/Dec of the Moon from the principal periodic terms of Meeus,
//! *Astronomical Algorithms* (2nd ed.), ch. 47. Keeping the terms above
//! ~0.04° in longitude bounds the error around 0.3°; topocentric parallax
//! (≤ 1°) is also neglected. Both are far below any sensible Moon-separation
//! threshold, which is expressed in tens of degrees.

use crate::astro::RaDec;
use crate::constants::{DPI, MJD, RADEG, T2000};

/// Geocentric lunar RA/Dec at a given instant.
///
/// Arguments
/// -----------------
/// * `tjm`: Modified Julian Date (UT).
///
/// Return
/// ----------
/// * Equatorial coordinates in radians, RA normalized to [0, 2π).
pub fn moon_radec(tjm: MJD) -> RaDec {
    let t = (tjm - T2000) / 36525.0;

    // Fundamental arguments (degrees): mean longitude, mean elongation,
    // solar and lunar mean anomalies, argument of latitude.
    let lp = (218.316_447_7 + 481_267.881_234_21 * t).rem_euclid(360.0);
    let d = (297.850_192_1 + 445_267.111_403_4 * t).rem_euclid(360.0) * RADEG;
    let m = (357.529_109_2 + 35_999.050_290_9 * t).rem_euclid(360.0) * RADEG;
    let mp = (134.963_396_4 + 477_198.867_505_5 * t).rem_euclid(360.0) * RADEG;
    let f = (93.272_095_0 + 483_202.017_523_3 * t).rem_euclid(360.0) * RADEG;

    // Ecliptic longitude: principal solar-perturbation terms (degrees)
    let lambda = lp
        + 6.288_774 * mp.sin()
        + 1.274_027 * (2.0 * d - mp).sin()
        + 0.658_314 * (2.0 * d).sin()
        + 0.213_618 * (2.0 * mp).sin()
        - 0.185_116 * m.sin()
        - 0.114_332 * (2.0 * f).sin()
        + 0.058_793 * (2.0 * (d - mp)).sin()
        + 0.057_066 * (2.0 * d - m - mp).sin()
        + 0.053_322 * (2.0 * d + mp).sin()
        + 0.045_758 * (2.0 * d - m).sin();

    // Ecliptic latitude (degrees)
    let beta = 5.128_122 * f.sin()
        + 0.280_602 * (mp + f).sin()
        + 0.277_693 * (mp - f).sin()
        + 0.173_237 * (2.0 * d - f).sin()
        + 0.055_413 * (2.0 * d - mp + f).sin()
        + 0.046_271 * (2.0 * d - mp - f).sin();

    let lambda = lambda.rem_euclid(360.0) * RADEG;
    let beta = beta * RADEG;
    let eps = (23.439291 - 0.0130042 * t) * RADEG;

    // Ecliptic → equatorial
    let ra = (lambda.sin() * eps.cos() - beta.tan() * eps.sin())
        .atan2(lambda.cos())
        .rem_euclid(DPI);
    let dec = (beta.sin() * eps.cos() + beta.cos() * eps.sin() * lambda.sin()).asin();

    RaDec { ra, dec }
}
