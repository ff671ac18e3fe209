//! # Query surface
//!
//! Read-side operations over a published [`Snapshot`]: rank tonight's
//! targets for a telescope, look one up by designation, and report pipeline
//! health. All three are pure over their snapshot argument — the caller
//! passes the snapshot it loaded, so a ranked list is internally consistent
//! even if a refresh publishes mid-query.

use std::collections::BTreeMap;

use hifitime::Epoch;
use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::neoplan_errors::NeoplanError;
use crate::observability::{compute_observability, ObservabilityConfig, ObservabilityResult};
use crate::scorer::{priority_score, ScoringWeights};
use crate::snapshot::{Snapshot, SourceHealth};
use crate::target::{ProviderId, Target};
use crate::telescope::TelescopeProfile;

/// One entry of the ranked nightly list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedTarget {
    pub target: Target,
    pub observability: ObservabilityResult,
    pub priority_score: f64,
}

/// Pipeline health as exposed to any status endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    /// When the current snapshot was built from fresh data. An old value
    /// under a running refresh loop means sustained provider failure.
    pub snapshot_published_at: Epoch,
    pub target_count: usize,
    pub sources: BTreeMap<ProviderId, SourceHealth>,
}

/// Rank the snapshot's targets for one telescope tonight.
///
/// Arguments
/// -----------------
/// * `snapshot`: The published world to rank (load it once, pass it in).
/// * `profile`: Site constraints; validated here, rejected if out of domain.
/// * `weights`: Scoring weights.
/// * `limit`: Optional cap on the returned list length.
/// * `now`: Start of tonight's 24 h observability horizon.
///
/// Return
/// ----------
/// * Observable targets with their observability data and priority score,
///   descending by score, ties broken by ascending designation.
pub fn rank(
    snapshot: &Snapshot,
    profile: &TelescopeProfile,
    weights: &ScoringWeights,
    limit: Option<usize>,
    now: Epoch,
) -> Result<Vec<RankedTarget>, NeoplanError> {
    profile.validate()?;
    let obs_config = ObservabilityConfig::default();

    let ranked: Vec<RankedTarget> = snapshot
        .targets
        .iter()
        .map(|target| {
            let observability = compute_observability(target, profile, now, &obs_config);
            let score = priority_score(target, &observability, profile, weights);
            RankedTarget {
                target: target.clone(),
                observability,
                priority_score: score,
            }
        })
        .filter(|entry| entry.observability.observable)
        .sorted_by(|a, b| {
            b.priority_score
                .total_cmp(&a.priority_score)
                .then_with(|| a.target.designation.cmp(&b.target.designation))
        })
        .collect();

    Ok(match limit {
        Some(cap) => ranked.into_iter().take(cap).collect(),
        None => ranked,
    })
}

/// Find a target by designation or declared cross-identification.
pub fn lookup<'a>(snapshot: &'a Snapshot, designation: &str) -> Option<&'a Target> {
    snapshot.targets.iter().find(|t| t.answers_to(designation))
}

/// Per-provider freshness plus the snapshot's own publish timestamp.
pub fn health(snapshot: &Snapshot) -> HealthStatus {
    HealthStatus {
        snapshot_published_at: snapshot.published_at,
        target_count: snapshot.targets.len(),
        sources: snapshot.sources.clone(),
    }
}
