//! # Telescope profile
//!
//! [`TelescopeProfile`] parameterizes every observability decision for one
//! observing site: geographic location, sensitivity, and the hard observing
//! constraints (minimum altitude, darkness threshold, Moon separation).
//!
//! A profile is caller-supplied and immutable for the duration of one query;
//! the core keeps no registry of named sites. Validation is strict: a field
//! outside its domain is rejected with
//! [`NeoplanError::InvalidProfile`](crate::neoplan_errors::NeoplanError::InvalidProfile),
//! never silently clamped.

use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Magnitude, Meter};
use crate::neoplan_errors::NeoplanError;

/// Description of a follow-up telescope / observing site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelescopeProfile {
    /// Optional human-readable site name.
    pub name: Option<String>,

    // Location
    /// Geodetic latitude (degrees, north positive).
    pub lat: Degree,
    /// Geodetic longitude (degrees, east positive).
    pub lon: Degree,
    /// Altitude above sea level (metres).
    pub alt_m: Meter,

    // Optics
    /// Faintest detectable magnitude.
    pub limiting_mag: Magnitude,
    /// Primary mirror / lens diameter (metres).
    pub aperture_m: Option<f64>,

    // Observing constraints
    /// Minimum target altitude above the horizon (degrees).
    pub min_altitude_deg: Degree,
    /// The Sun must be below this altitude for the sky to count as dark
    /// (degrees; -12 is nautical, -18 astronomical darkness).
    pub max_sun_alt_deg: Degree,
    /// Minimum angular distance from the Moon (degrees).
    pub min_moon_sep_deg: Degree,
}

impl Default for TelescopeProfile {
    fn default() -> Self {
        TelescopeProfile {
            name: None,
            lat: 0.0,
            lon: 0.0,
            alt_m: 0.0,
            limiting_mag: 18.0,
            aperture_m: Some(0.2),
            min_altitude_deg: 20.0,
            max_sun_alt_deg: -12.0,
            min_moon_sep_deg: 30.0,
        }
    }
}

impl TelescopeProfile {
    /// Check every field against its domain.
    ///
    /// Return
    /// ----------
    /// * `Ok(())` when the profile is usable, or
    ///   [`NeoplanError::InvalidProfile`] naming the offending field.
    pub fn validate(&self) -> Result<(), NeoplanError> {
        if !(-90.0..=90.0).contains(&self.lat) || !self.lat.is_finite() {
            return Err(NeoplanError::InvalidProfile(format!(
                "lat {} outside [-90, 90]",
                self.lat
            )));
        }
        if !(-180.0..=360.0).contains(&self.lon) || !self.lon.is_finite() {
            return Err(NeoplanError::InvalidProfile(format!(
                "lon {} outside [-180, 360]",
                self.lon
            )));
        }
        if !self.alt_m.is_finite() {
            return Err(NeoplanError::InvalidProfile("alt_m is not finite".into()));
        }
        if !self.limiting_mag.is_finite() {
            return Err(NeoplanError::InvalidProfile(
                "limiting_mag is not finite".into(),
            ));
        }
        if let Some(d) = self.aperture_m {
            if !(d.is_finite() && d > 0.0) {
                return Err(NeoplanError::InvalidProfile(format!(
                    "aperture_m {d} must be positive"
                )));
            }
        }
        if !(0.0..90.0).contains(&self.min_altitude_deg) {
            return Err(NeoplanError::InvalidProfile(format!(
                "min_altitude_deg {} outside [0, 90)",
                self.min_altitude_deg
            )));
        }
        if !(-90.0..=0.0).contains(&self.max_sun_alt_deg) {
            return Err(NeoplanError::InvalidProfile(format!(
                "max_sun_alt_deg {} outside [-90, 0]",
                self.max_sun_alt_deg
            )));
        }
        if !(0.0..=180.0).contains(&self.min_moon_sep_deg) {
            return Err(NeoplanError::InvalidProfile(format!(
                "min_moon_sep_deg {} outside [0, 180]",
                self.min_moon_sep_deg
            )));
        }
        Ok(())
    }
}
