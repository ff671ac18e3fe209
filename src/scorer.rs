//! # Priority scorer
//!
//! Ranks targets by scientific value and urgency. Every factor is normalized
//! to [0, 1] before weighting so the caller-supplied weights compare like
//! with like; the combined score is rescaled to 0–100.
//!
//! The function is **pure and deterministic**: identical inputs and weights
//! produce bit-identical scores. Absent input fields contribute zero to
//! their term instead of excluding the target.

use serde::{Deserialize, Serialize};

use crate::constants::ARC_DAYS_FLOOR;
use crate::observability::ObservabilityResult;
use crate::target::Target;
use crate::telescope::TelescopeProfile;

/// Caller-configurable term weights. Defaults favor impact risk and hazard
/// scores over bookkeeping urgency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Days since last observation (more overdue ⇒ higher).
    pub not_seen_days: f64,
    /// Orbit uncertainty: shorter observation arc ⇒ higher.
    pub arc_uncertainty: f64,
    /// NEO likelihood score (0–100 feed scale).
    pub neo_score: f64,
    /// Potentially-hazardous-asteroid score.
    pub pha_score: f64,
    /// Earth impact probability, log-scaled.
    pub impact_prob: f64,
    /// Length of tonight's usable window.
    pub obs_window_hours: f64,
    /// Margin between the site's limiting magnitude and the target's
    /// predicted brightness (brighter ⇒ higher).
    pub brightness_margin: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        ScoringWeights {
            not_seen_days: 1.0,
            arc_uncertainty: 1.0,
            neo_score: 1.0,
            pha_score: 1.5,
            impact_prob: 3.0,
            obs_window_hours: 0.5,
            brightness_margin: 0.3,
        }
    }
}

impl ScoringWeights {
    fn total(&self) -> f64 {
        self.not_seen_days
            + self.arc_uncertainty
            + self.neo_score
            + self.pha_score
            + self.impact_prob
            + self.obs_window_hours
            + self.brightness_margin
    }
}

/// Compute the priority score of one target on a 0–100 scale.
///
/// Term normalizations:
/// - `not_seen_days`: linear, saturating at 7 days.
/// - arc uncertainty: `ARC_DAYS_FLOOR / max(arc_days, ARC_DAYS_FLOOR)` — 1.0
///   for brand-new arcs, decaying as the arc grows; the floor avoids a
///   divide-by-zero for fresh detections.
/// - `neo_score`, `pha_score`: direct 0–100 feed scale, divided by 100.
/// - `impact_prob`: `(log10 p + 9) / 7`, clamped — probabilities span many
///   orders of magnitude, a linear term would flatten everything below 1e-3.
/// - `obs_window_hours`: linear, saturating at 6 hours.
/// - brightness margin: `(limiting_mag − mag_v) / 5`, clamped — a target two
///   magnitudes inside the limit is a far safer detection than one at it.
pub fn priority_score(
    target: &Target,
    observability: &ObservabilityResult,
    profile: &TelescopeProfile,
    weights: &ScoringWeights,
) -> f64 {
    let urgency = clamp01(target.not_seen_days.unwrap_or(0.0) / 7.0);

    let arc_uncertainty = match target.arc_days {
        Some(arc) => clamp01(ARC_DAYS_FLOOR / arc.max(ARC_DAYS_FLOOR)),
        None => 0.0,
    };

    let neo = clamp01(target.neo_score.unwrap_or(0.0) / 100.0);
    let pha = clamp01(target.pha_score.unwrap_or(0.0) / 100.0);

    let impact = match target.impact_prob {
        Some(p) if p > 0.0 => clamp01((p.log10() + 9.0) / 7.0),
        _ => 0.0,
    };

    let window = clamp01(observability.obs_window_hours / 6.0);

    let brightness = match target.mag_v {
        Some(mag) => clamp01((profile.limiting_mag - mag) / 5.0),
        None => 0.0,
    };

    let total_weight = weights.total();
    if total_weight <= 0.0 {
        return 0.0;
    }

    let weighted = urgency * weights.not_seen_days
        + arc_uncertainty * weights.arc_uncertainty
        + neo * weights.neo_score
        + pha * weights.pha_score
        + impact * weights.impact_prob
        + window * weights.obs_window_hours
        + brightness * weights.brightness_margin;

    weighted / total_weight * 100.0
}

fn clamp01(x: f64) -> f64 {
    x.clamp(0.0, 1.0)
}

#[cfg(test)]
mod scorer_test {
    use super::*;
    use crate::observability::{NotObservableReason, ObservabilityResult};
    use crate::target::ProviderId;
    use hifitime::Epoch;

    fn blank_result(hours: f64) -> ObservabilityResult {
        ObservabilityResult {
            observable: true,
            reason: None,
            dark_window: None,
            obs_window: None,
            obs_window_hours: hours,
            best_altitude_deg: None,
            best_airmass: None,
            transit_time: None,
            moon_sep_deg: None,
        }
    }

    fn target() -> Target {
        Target::new(
            "P21abcd",
            ProviderId::Neocp,
            Epoch::from_gregorian_utc_hms(2026, 2, 15, 12, 0, 0),
        )
    }

    fn site() -> TelescopeProfile {
        TelescopeProfile {
            limiting_mag: 19.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_absent_fields_contribute_zero() {
        let t = target();
        let score = priority_score(&t, &blank_result(0.0), &site(), &ScoringWeights::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_scoring_is_deterministic() {
        let mut t = target();
        t.neo_score = Some(87.0);
        t.arc_days = Some(0.4);
        t.impact_prob = Some(3.2e-5);
        let obs = blank_result(4.33);
        let w = ScoringWeights::default();
        let a = priority_score(&t, &obs, &site(), &w);
        let b = priority_score(&t, &obs, &site(), &w);
        assert_eq!(a.to_bits(), b.to_bits());
        assert!(a > 0.0);
    }

    #[test]
    fn test_shorter_arc_scores_higher() {
        let obs = blank_result(2.0);
        let w = ScoringWeights::default();
        let mut fresh = target();
        fresh.arc_days = Some(0.01);
        let mut settled = target();
        settled.arc_days = Some(25.0);
        assert!(
            priority_score(&fresh, &obs, &site(), &w)
                > priority_score(&settled, &obs, &site(), &w)
        );
    }

    #[test]
    fn test_impact_probability_is_log_scaled() {
        let obs = blank_result(0.0);
        let w = ScoringWeights {
            not_seen_days: 0.0,
            arc_uncertainty: 0.0,
            neo_score: 0.0,
            pha_score: 0.0,
            impact_prob: 1.0,
            obs_window_hours: 0.0,
            brightness_margin: 0.0,
        };
        let mut a = target();
        a.impact_prob = Some(1e-6);
        let mut b = target();
        b.impact_prob = Some(1e-4);
        let sa = priority_score(&a, &obs, &site(), &w);
        let sb = priority_score(&b, &obs, &site(), &w);
        // Two orders of magnitude in probability move the term by 2/7 of scale,
        // not by a factor of 100.
        assert!(sb > sa);
        assert!((sb - sa - 2.0 / 7.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_urgency_saturates_at_a_week() {
        let obs = blank_result(0.0);
        let w = ScoringWeights::default();
        let mut week = target();
        week.not_seen_days = Some(7.0);
        let mut month = target();
        month.not_seen_days = Some(30.0);
        assert_eq!(
            priority_score(&week, &obs, &site(), &w),
            priority_score(&month, &obs, &site(), &w)
        );
    }

    #[test]
    fn test_brightness_margin_rewards_headroom() {
        let obs = blank_result(0.0);
        let w = ScoringWeights {
            not_seen_days: 0.0,
            arc_uncertainty: 0.0,
            neo_score: 0.0,
            pha_score: 0.0,
            impact_prob: 0.0,
            obs_window_hours: 0.0,
            brightness_margin: 1.0,
        };
        let mut comfortable = target();
        comfortable.mag_v = Some(17.0); // 2.5 mag inside the 19.5 limit
        let mut marginal = target();
        marginal.mag_v = Some(19.4);
        let mut unknown = target();
        unknown.mag_v = None;

        let sc = priority_score(&comfortable, &obs, &site(), &w);
        let sm = priority_score(&marginal, &obs, &site(), &w);
        let su = priority_score(&unknown, &obs, &site(), &w);
        assert!(sc > sm);
        assert_eq!(su, 0.0);
        // margin 2.5 over a 5-mag scale → 50 on the 0-100 output.
        assert!((sc - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_rejected_target_can_still_be_scored() {
        // The scorer never panics on rejection diagnostics.
        let t = target();
        let mut obs = blank_result(0.0);
        obs.observable = false;
        obs.reason = Some(NotObservableReason::TooFaint);
        assert_eq!(
            priority_score(&t, &obs, &site(), &ScoringWeights::default()),
            0.0
        );
    }
}
