//! # Horizon coordinates and airmass
//!
//! Transformations from catalog (equatorial) coordinates to the local horizon
//! frame of an observing site, plus the empirical airmass model used for
//! ranking observation quality.
//!
//! ## Conventions
//!
//! - Sidereal time follows the IAU 1982/2000 polynomial for GMST at 0h UT1,
//!   with the fractional-day term scaled by the solar→sidereal day ratio.
//! - Longitudes are east-positive; the local sidereal time is
//!   `GMST + longitude`.
//! - UT1 − UTC is neglected (< 1 s, i.e. < 0.004° of Earth rotation), far
//!   below the sampling resolution of the observability scan.

use nalgebra::Vector3;

use crate::astro::RaDec;
use crate::constants::{Degree, Radian, DPI, MJD, RADEG, T2000};

/// Compute the Greenwich Mean Sidereal Time (GMST) in radians
/// for a given Modified Julian Date (UT1 time scale).
///
/// Arguments
/// -----------------
/// * `tjm`: Modified Julian Date (MJD, UT1 time scale).
///
/// Return
/// ----------
/// * GMST angle in radians, normalized to the interval [0, 2π).
pub fn gmst(tjm: MJD) -> Radian {
    // Polynomial coefficients for GMST at 0h UT1 (in seconds)
    const C0: f64 = 24110.54841;
    const C1: f64 = 8640184.812866;
    const C2: f64 = 9.3104e-2;
    const C3: f64 = -6.2e-6;

    // Ratio of sidereal day to solar day
    const RAP: f64 = 1.00273790934;

    let itjm = tjm.floor();
    let t = (itjm - T2000) / 36525.0;

    // GMST at 0h UT1, seconds → radians
    let gmst0 = (((C3 * t + C2) * t + C1) * t + C0) * DPI / 86400.0;

    // Fraction of the current day, scaled to the sidereal rate
    let h = tjm.fract() * DPI;
    (gmst0 + h * RAP).rem_euclid(DPI)
}

/// Local sidereal time for an east-positive longitude, radians in [0, 2π).
pub fn local_sidereal_time(tjm: MJD, lon_deg: Degree) -> Radian {
    (gmst(tjm) + lon_deg * RADEG).rem_euclid(DPI)
}

/// Topocentric altitude of an equatorial position, in degrees.
///
/// Standard spherical-triangle solution:
/// `sin(alt) = sin(φ)·sin(δ) + cos(φ)·cos(δ)·cos(H)` with hour angle
/// `H = LST − α`.
///
/// Arguments
/// -----------------
/// * `pos`: Equatorial coordinates (radians).
/// * `lat_deg`, `lon_deg`: Geodetic site coordinates (degrees).
/// * `tjm`: Instant as MJD (UT).
pub fn altitude_deg(pos: &RaDec, lat_deg: Degree, lon_deg: Degree, tjm: MJD) -> Degree {
    let phi = lat_deg * RADEG;
    let hour_angle = local_sidereal_time(tjm, lon_deg) - pos.ra;

    let sin_alt = phi.sin() * pos.dec.sin() + phi.cos() * pos.dec.cos() * hour_angle.cos();
    sin_alt.clamp(-1.0, 1.0).asin() / RADEG
}

/// Unit direction vector of an equatorial position.
pub fn unit_vector(pos: &RaDec) -> Vector3<f64> {
    Vector3::new(
        pos.dec.cos() * pos.ra.cos(),
        pos.dec.cos() * pos.ra.sin(),
        pos.dec.sin(),
    )
}

/// Great-circle angular separation between two equatorial positions, degrees.
///
/// Computed from the direction-cosine dot product, which is well conditioned
/// over the separations the matcher and the Moon gate care about.
pub fn angular_separation_deg(a: &RaDec, b: &RaDec) -> Degree {
    let cos_sep = unit_vector(a).dot(&unit_vector(b)).clamp(-1.0, 1.0);
    cos_sep.acos() / RADEG
}

/// Relative airmass from altitude using the Pickering (2002) empirical
/// formula, valid down to the horizon (unlike the secant-of-zenith
/// approximation).
///
/// Return
/// ----------
/// * Airmass ≥ 1.0 for any altitude above the horizon; a large sentinel
///   (Pickering's own convention) at or below it.
pub fn airmass_pickering(altitude_deg: Degree) -> f64 {
    if altitude_deg <= 0.0 {
        return 99.0;
    }
    let h = altitude_deg;
    let refraction_arg = h + 244.0 / (165.0 + 47.0 * h.powf(1.1));
    (1.0 / (refraction_arg * RADEG).sin()).max(1.0)
}

#[cfg(test)]
mod horizon_test {
    use super::*;

    #[test]
    fn test_gmst_reference_values() {
        // Same reference instants as the classical IAU-1982 implementation.
        let res = gmst(57028.478514610404);
        assert!((res - 4.851925725092499).abs() < 1e-9);

        let res = gmst(T2000);
        assert!((res - 4.894961212789145).abs() < 1e-9);
    }

    #[test]
    fn test_altitude_at_upper_transit() {
        // At upper transit (H = 0), alt = 90 - |φ - δ|.
        let lat = 42.6138;
        let lon = -71.4889;
        let dec: f64 = 58.112;

        // Find the MJD where the hour angle vanishes by inverting LST = RA.
        let ra: f64 = 5.127 * RADEG;
        let mjd0 = 61086.5; // 2026-02-15T12:00 UTC
        let mut best = (f64::MAX, 0.0);
        for i in 0..24 * 60 {
            let m = mjd0 + i as f64 / 1440.0;
            let ha = (local_sidereal_time(m, lon) - ra).rem_euclid(DPI);
            let ha = if ha > std::f64::consts::PI { ha - DPI } else { ha };
            if ha.abs() < best.0 {
                best = (ha.abs(), m);
            }
        }
        let alt = altitude_deg(
            &RaDec {
                ra,
                dec: dec * RADEG,
            },
            lat,
            lon,
            best.1,
        );
        let expected = 90.0 - (lat - dec).abs();
        assert!((alt - expected).abs() < 0.1, "alt = {alt}, expected {expected}");
    }

    #[test]
    fn test_angular_separation_poles() {
        let north = RaDec {
            ra: 0.0,
            dec: std::f64::consts::FRAC_PI_2,
        };
        let south = RaDec {
            ra: 1.0,
            dec: -std::f64::consts::FRAC_PI_2,
        };
        assert!((angular_separation_deg(&north, &south) - 180.0).abs() < 1e-9);
    }

    #[test]
    fn test_angular_separation_small_angle() {
        // 2 arcseconds in RA at the equator.
        let a = RaDec { ra: 0.0, dec: 0.0 };
        let b = RaDec {
            ra: 2.0 * crate::constants::RADSEC,
            dec: 0.0,
        };
        let sep = angular_separation_deg(&a, &b) * 3600.0;
        assert!((sep - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_airmass_zenith_and_horizon() {
        assert!((airmass_pickering(90.0) - 1.0).abs() < 1e-3);
        // Pickering 2002 gives ~38 at the true horizon.
        let at_horizon = airmass_pickering(0.001);
        assert!(at_horizon > 30.0 && at_horizon < 45.0);
        // Below the horizon: sentinel.
        assert_eq!(airmass_pickering(-5.0), 99.0);
    }

    #[test]
    fn test_airmass_monotonic_in_altitude() {
        let mut last = f64::MAX;
        for alt in [5.0, 10.0, 20.0, 30.0, 45.0, 60.0, 75.0, 90.0] {
            let x = airmass_pickering(alt);
            assert!(x < last, "airmass must decrease with altitude");
            last = x;
        }
    }
}
