//! # Observability engine
//!
//! Decides if and when a target is usefully observable from a given site
//! tonight. The entry point, [`compute_observability`], is a **pure
//! function**: no shared state, idempotent, safe to fan out per target.
//!
//! ## Pipeline (gates evaluate in order, short-circuiting)
//!
//! ```text
//! position present
//!   → dark window   (sun altitude sampling, 24 h horizon)
//!   → altitude scan (target altitude inside the dark window)
//!   → Moon gate     (separation at the dark-window midpoint, hard gate)
//!   → brightness    (mag_v against the site's limiting magnitude)
//!   → airmass       (Pickering 2002 over the observation window)
//! ```
//!
//! A failed gate yields `observable = false` with a
//! [`NotObservableReason`]; everything computed before the failing gate is
//! still reported for diagnostics. "Not observable tonight" is an expected
//! outcome, never an error.

use hifitime::{Duration, Epoch, Unit};
use serde::{Deserialize, Serialize};

use crate::astro::horizon::{airmass_pickering, altitude_deg, angular_separation_deg};
use crate::astro::moon::moon_radec;
use crate::astro::sun::sun_radec;
use crate::astro::RaDec;
use crate::constants::{
    Degree, DARK_SCAN_HORIZON_S, DEFAULT_ALTITUDE_STEP_S, DEFAULT_DARK_STEP_S, RADEG,
};
use crate::target::Target;
use crate::telescope::TelescopeProfile;

/// Sampling configuration for the observability scans.
#[derive(Debug, Clone, Copy)]
pub struct ObservabilityConfig {
    /// Step of the sun-altitude scan across the 24 h horizon.
    pub dark_step: Duration,
    /// Step of the target-altitude scan inside the dark window.
    pub altitude_step: Duration,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        ObservabilityConfig {
            dark_step: Duration::from_seconds(DEFAULT_DARK_STEP_S),
            altitude_step: Duration::from_seconds(DEFAULT_ALTITUDE_STEP_S),
        }
    }
}

/// Why a target was rejected for tonight. Degenerate geometry is an expected
/// outcome and carries a reason code instead of an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotObservableReason {
    /// The record carries no usable sky position (e.g. a risk-list entry
    /// that never matched a positional feed).
    NoPosition,
    /// The Sun never drops below the darkness threshold within the horizon
    /// (e.g. high-latitude summer).
    NoDarkness,
    /// The target never exceeds the minimum altitude during darkness.
    NeverRises,
    /// Angular separation from the Moon is below the site threshold.
    MoonTooClose,
    /// `mag_v` absent or fainter than the site's limiting magnitude.
    TooFaint,
}

/// A half-open-free, inclusive time interval between two sampled instants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start: Epoch,
    pub end: Epoch,
}

impl TimeWindow {
    /// Interval length in hours.
    pub fn hours(&self) -> f64 {
        (self.end - self.start).to_unit(Unit::Hour)
    }

    /// Midpoint instant.
    pub fn midpoint(&self) -> Epoch {
        self.start + (self.end - self.start) * 0.5
    }
}

/// Derived per-(target, profile, night) observability data. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityResult {
    pub observable: bool,
    pub reason: Option<NotObservableReason>,
    /// Longest contiguous interval with the Sun below the darkness threshold.
    pub dark_window: Option<TimeWindow>,
    /// Longest contiguous interval, inside the dark window, with the target
    /// above the minimum altitude.
    pub obs_window: Option<TimeWindow>,
    pub obs_window_hours: f64,
    /// Maximum target altitude sampled within the observation window.
    pub best_altitude_deg: Option<Degree>,
    /// Minimum (best) airmass over the observation window, ≥ 1.0.
    pub best_airmass: Option<f64>,
    /// Instant of minimum airmass within the observation window.
    pub transit_time: Option<Epoch>,
    /// Target-Moon separation at the dark-window midpoint.
    pub moon_sep_deg: Option<Degree>,
}

impl ObservabilityResult {
    fn rejected(reason: NotObservableReason) -> Self {
        ObservabilityResult {
            observable: false,
            reason: Some(reason),
            dark_window: None,
            obs_window: None,
            obs_window_hours: 0.0,
            best_altitude_deg: None,
            best_airmass: None,
            transit_time: None,
            moon_sep_deg: None,
        }
    }
}

/// Compute tonight's observability of one target from one site.
///
/// Arguments
/// -----------------
/// * `target`: The candidate; only its catalog position and `mag_v` are read.
/// * `profile`: Site location and observing constraints (assumed validated).
/// * `now`: Start of the 24 h scan horizon.
/// * `config`: Sampling steps.
///
/// Return
/// ----------
/// * An [`ObservabilityResult`]; `observable = false` outcomes keep every
///   field computed before the failing gate.
pub fn compute_observability(
    target: &Target,
    profile: &TelescopeProfile,
    now: Epoch,
    config: &ObservabilityConfig,
) -> ObservabilityResult {
    let (Some(ra_deg), Some(dec_deg)) = (target.ra_deg, target.dec_deg) else {
        return ObservabilityResult::rejected(NotObservableReason::NoPosition);
    };
    let pos = RaDec {
        ra: ra_deg * RADEG,
        dec: dec_deg * RADEG,
    };

    // 1. Dark window: longest contiguous run of sun altitude below threshold.
    let dark_steps = (DARK_SCAN_HORIZON_S / config.dark_step.to_seconds()) as i64;
    let dark_samples: Vec<Epoch> = (0..=dark_steps)
        .map(|i| now + config.dark_step * i)
        .collect();
    let is_dark: Vec<bool> = dark_samples
        .iter()
        .map(|t| {
            let tjm = t.to_mjd_utc_days();
            altitude_deg(&sun_radec(tjm), profile.lat, profile.lon, tjm) < profile.max_sun_alt_deg
        })
        .collect();

    let Some((dark_start, dark_len)) = longest_run(&is_dark) else {
        return ObservabilityResult::rejected(NotObservableReason::NoDarkness);
    };
    let dark_window = TimeWindow {
        start: dark_samples[dark_start],
        end: dark_samples[dark_start + dark_len - 1],
    };

    let mut result = ObservabilityResult {
        observable: false,
        reason: None,
        dark_window: Some(dark_window),
        obs_window: None,
        obs_window_hours: 0.0,
        best_altitude_deg: None,
        best_airmass: None,
        transit_time: None,
        moon_sep_deg: None,
    };

    // 2. Altitude scan inside the dark window, at the finer step.
    let mut scan_samples: Vec<Epoch> = Vec::new();
    let mut t = dark_window.start;
    while t <= dark_window.end {
        scan_samples.push(t);
        t += config.altitude_step;
    }
    let altitudes: Vec<Degree> = scan_samples
        .iter()
        .map(|t| altitude_deg(&pos, profile.lat, profile.lon, t.to_mjd_utc_days()))
        .collect();
    let above: Vec<bool> = altitudes
        .iter()
        .map(|alt| *alt > profile.min_altitude_deg)
        .collect();

    let Some((obs_start, obs_len)) = longest_run(&above) else {
        result.reason = Some(NotObservableReason::NeverRises);
        return result;
    };
    let obs_window = TimeWindow {
        start: scan_samples[obs_start],
        end: scan_samples[obs_start + obs_len - 1],
    };
    result.obs_window = Some(obs_window);
    result.obs_window_hours = obs_window.hours();

    // 3. Moon separation at the dark-window midpoint: hard gate.
    let mid_tjm = dark_window.midpoint().to_mjd_utc_days();
    let moon_sep = angular_separation_deg(&pos, &moon_radec(mid_tjm));
    result.moon_sep_deg = Some(moon_sep);
    if moon_sep < profile.min_moon_sep_deg {
        result.reason = Some(NotObservableReason::MoonTooClose);
        return result;
    }

    // 4. Brightness gate: an unknown magnitude is treated as too faint.
    match target.mag_v {
        Some(mag) if mag <= profile.limiting_mag => {}
        _ => {
            result.reason = Some(NotObservableReason::TooFaint);
            return result;
        }
    }

    // 5. Airmass over the observation window.
    let window_alts = &altitudes[obs_start..obs_start + obs_len];
    let mut best_airmass = f64::MAX;
    let mut transit = obs_window.start;
    let mut best_altitude = f64::MIN;
    for (offset, alt) in window_alts.iter().enumerate() {
        let airmass = airmass_pickering(*alt);
        if airmass < best_airmass {
            best_airmass = airmass;
            transit = scan_samples[obs_start + offset];
        }
        best_altitude = best_altitude.max(*alt);
    }

    result.observable = true;
    result.best_altitude_deg = Some(best_altitude);
    result.best_airmass = Some(best_airmass);
    result.transit_time = Some(transit);
    result
}

/// Index and length of the longest contiguous `true` run, first one on ties.
fn longest_run(mask: &[bool]) -> Option<(usize, usize)> {
    let mut best: Option<(usize, usize)> = None;
    let mut i = 0;
    while i < mask.len() {
        if mask[i] {
            let start = i;
            while i < mask.len() && mask[i] {
                i += 1;
            }
            let len = i - start;
            if best.map_or(true, |(_, l)| len > l) {
                best = Some((start, len));
            }
        } else {
            i += 1;
        }
    }
    best
}
