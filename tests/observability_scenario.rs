//! Full-scenario tests of the observability engine against a mid-northern
//! site on a winter night. Tolerances reflect the low-precision analytic
//! Sun/Moon models and the discrete sampling grid.

use hifitime::{Duration, Epoch};

use neoplan::observability::{
    compute_observability, NotObservableReason, ObservabilityConfig,
};
use neoplan::target::{ProviderId, Target};
use neoplan::telescope::TelescopeProfile;

fn wallace_profile() -> TelescopeProfile {
    TelescopeProfile {
        name: Some("Wallace Astrophysical Observatory".to_string()),
        lat: 42.6138,
        lon: -71.4889,
        alt_m: 180.0,
        limiting_mag: 19.5,
        aperture_m: Some(0.6),
        min_altitude_deg: 20.0,
        max_sun_alt_deg: -12.0,
        min_moon_sep_deg: 30.0,
    }
}

fn february_candidate(mag_v: f64) -> (Target, Epoch) {
    let now = Epoch::from_gregorian_utc_hms(2026, 2, 15, 12, 0, 0);
    let mut target = Target::new("P21abcd", ProviderId::Neocp, now);
    target.ra_deg = Some(5.127);
    target.dec_deg = Some(58.112);
    target.epoch = Some(now);
    target.mag_v = Some(mag_v);
    (target, now)
}

fn minutes_between(a: Epoch, b: Epoch) -> f64 {
    (a - b).abs().to_seconds() / 60.0
}

#[test]
fn test_winter_candidate_is_observable_with_expected_window() {
    let (target, now) = february_candidate(19.1);
    let result = compute_observability(
        &target,
        &wallace_profile(),
        now,
        &ObservabilityConfig::default(),
    );

    assert!(result.observable, "reason: {:?}", result.reason);

    let obs = result.obs_window.expect("observation window");
    let expected_start = Epoch::from_gregorian_utc_hms(2026, 2, 15, 23, 30, 0);
    let expected_end = Epoch::from_gregorian_utc_hms(2026, 2, 16, 3, 50, 0);
    assert!(
        minutes_between(obs.start, expected_start) <= 20.0,
        "window start {} vs expected {}",
        obs.start,
        expected_start
    );
    assert!(
        minutes_between(obs.end, expected_end) <= 25.0,
        "window end {} vs expected {}",
        obs.end,
        expected_end
    );
    assert!(
        result.obs_window_hours > 3.8 && result.obs_window_hours < 4.7,
        "hours = {}",
        result.obs_window_hours
    );

    let alt = result.best_altitude_deg.unwrap();
    assert!((alt - 49.5).abs() < 1.5, "best altitude = {alt}");

    let airmass = result.best_airmass.unwrap();
    assert!((airmass - 1.31).abs() < 0.05, "best airmass = {airmass}");

    let moon_sep = result.moon_sep_deg.unwrap();
    assert!(moon_sep >= 30.0, "Moon gate must pass, sep = {moon_sep}");
    assert!(
        (80.0..115.0).contains(&moon_sep),
        "Moon separation = {moon_sep}"
    );

    let transit = result.transit_time.unwrap();
    assert!(transit >= obs.start && transit <= obs.end);
}

#[test]
fn test_faint_candidate_is_rejected_regardless_of_geometry() {
    // Same geometry as the observable case, but fainter than the site limit.
    let (target, now) = february_candidate(20.2);
    let result = compute_observability(
        &target,
        &wallace_profile(),
        now,
        &ObservabilityConfig::default(),
    );

    assert!(!result.observable);
    assert_eq!(result.reason, Some(NotObservableReason::TooFaint));
    // Geometry diagnostics survive the rejection.
    assert!(result.dark_window.is_some());
    assert!(result.obs_window.is_some());
    assert!(result.moon_sep_deg.is_some());
}

#[test]
fn test_unknown_magnitude_is_treated_as_too_faint() {
    let (mut target, now) = february_candidate(19.1);
    target.mag_v = None;
    let result = compute_observability(
        &target,
        &wallace_profile(),
        now,
        &ObservabilityConfig::default(),
    );
    assert!(!result.observable);
    assert_eq!(result.reason, Some(NotObservableReason::TooFaint));
}

#[test]
fn test_obs_window_is_contained_in_dark_window_across_the_sky() {
    // Property sweep over a ring of declinations: wherever a window exists,
    // it must sit inside the dark window and best airmass must be ≥ 1.
    let profile = wallace_profile();
    let now = Epoch::from_gregorian_utc_hms(2026, 2, 15, 12, 0, 0);
    for dec in [-30.0, -10.0, 0.0, 15.0, 30.0, 45.0, 60.0, 75.0, 89.0] {
        for ra in [0.0, 60.0, 120.0, 180.0, 240.0, 300.0] {
            let mut target = Target::new("sweep", ProviderId::Neocp, now);
            target.ra_deg = Some(ra);
            target.dec_deg = Some(dec);
            target.epoch = Some(now);
            target.mag_v = Some(15.0);

            let result =
                compute_observability(&target, &profile, now, &ObservabilityConfig::default());
            if let (Some(dark), Some(obs)) = (result.dark_window, result.obs_window) {
                assert!(obs.start >= dark.start && obs.end <= dark.end);
            }
            if result.observable {
                assert!(result.best_airmass.unwrap() >= 1.0);
                assert!(result.moon_sep_deg.unwrap() >= profile.min_moon_sep_deg);
            }
        }
    }
}

#[test]
fn test_custom_sampling_step_respects_window_resolution() {
    let (target, now) = february_candidate(19.1);
    let coarse = ObservabilityConfig {
        dark_step: Duration::from_seconds(30.0 * 60.0),
        altitude_step: Duration::from_seconds(30.0 * 60.0),
    };
    let result = compute_observability(&target, &wallace_profile(), now, &coarse);
    assert!(result.observable);
    // Coarser sampling still finds a window of roughly the same span.
    assert!(result.obs_window_hours > 3.0 && result.obs_window_hours < 5.0);
}
