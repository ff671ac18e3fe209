//! # Cross-source deduplicator
//!
//! Reconciles records that describe the same physical object across feeds.
//!
//! ## Matching
//!
//! Two records match when either rule holds:
//! - **(a) cone + epoch**: great-circle separation below the configured
//!   radius (default 2″) *and* position epochs within the configured window
//!   (default 1 h). Fast movers drift, so a nominally close pair with
//!   distant epochs is rejected.
//! - **(b) declared alias**: either record lists the other's designation as
//!   a cross-identification.
//!
//! ## Clustering before merging
//!
//! Matching is pairwise but transitive matches (A↔B, B↔C, A≁C) are coalesced
//! into one cluster *before* any merge, so the merged outcome is independent
//! of pairing order. A record that bridges two otherwise-unlinked groups is
//! ambiguous: it stays with the larger group and the smaller group survives
//! as independent targets, to be re-evaluated next cycle. Mis-merging two
//! distinct objects loses information; splitting one object merely delays
//! its enrichment. The interior of a transitive chain is *not* ambiguous:
//! its neighbors sit within chained-match reach of each other and the
//! cluster stays whole.
//!
//! ## Merge policy
//!
//! Records are folded oldest-first (update-time ascending, feed priority as
//! the tie-break): for every scalar field the most recently updated
//! non-absent value wins and a present value is never replaced by absence.
//! `contributing_sources` and aliases union; `raw` payloads concatenate.

use std::collections::BTreeSet;

use hifitime::Duration;
use itertools::Itertools;
use tracing::debug;

use crate::astro::horizon::angular_separation_deg;
use crate::astro::RaDec;
use crate::constants::{
    ARCSEC_PER_DEG, DEFAULT_EPOCH_WINDOW_S, DEFAULT_MATCH_RADIUS_ARCSEC, RADEG,
};
use crate::target::{ProviderId, Target};

/// Thresholds for cross-source matching. The defaults are reasonable rather
/// than verified constants, hence configuration instead of hard-coding.
#[derive(Debug, Clone, Copy)]
pub struct MatchConfig {
    /// Cone-search radius in arcseconds.
    pub match_radius_arcsec: f64,
    /// Maximum epoch difference for a positional match.
    pub epoch_window: Duration,
}

impl Default for MatchConfig {
    fn default() -> Self {
        MatchConfig {
            match_radius_arcsec: DEFAULT_MATCH_RADIUS_ARCSEC,
            epoch_window: Duration::from_seconds(DEFAULT_EPOCH_WINDOW_S),
        }
    }
}

/// Merge this cycle's fetched records with the previous snapshot's, returning
/// the deduplicated target set.
///
/// Arguments
/// -----------------
/// * `fresh`: Union of every record fetched this cycle, still provider-scoped.
/// * `previous`: The previously published snapshot's merged targets.
/// * `failed_sources`: Feeds that contributed nothing this cycle.
/// * `config`: Matching thresholds.
///
/// Return
/// ----------
/// * Merged targets, sorted by designation. Previous-snapshot records are
///   retained when they merge with a fresh record (their merged fields
///   persist until superseded) or when their feeds were unavailable this
///   cycle; records whose feeds answered but no longer report them drop out.
pub fn dedupe(
    fresh: Vec<Target>,
    previous: &[Target],
    failed_sources: &BTreeSet<ProviderId>,
    config: &MatchConfig,
) -> Vec<Target> {
    let fresh_count = fresh.len();
    let candidates: Vec<Target> = fresh
        .into_iter()
        .chain(previous.iter().cloned())
        .collect();

    let clusters = build_clusters(&candidates, config);

    clusters
        .into_iter()
        .filter(|cluster| {
            let has_fresh = cluster.iter().any(|&i| i < fresh_count);
            if has_fresh {
                return true;
            }
            // Carried-forward only: keep while its feeds are down.
            cluster.iter().any(|&i| {
                candidates[i]
                    .contributing_sources
                    .iter()
                    .any(|s| failed_sources.contains(s))
            })
        })
        .map(|cluster| merge_cluster(cluster.iter().map(|&i| &candidates[i])))
        .sorted_by(|a, b| a.designation.cmp(&b.designation))
        .collect()
}

/// Pairwise matching rule.
fn records_match(a: &Target, b: &Target, config: &MatchConfig) -> bool {
    if a.declares_alias_of(b) {
        return true;
    }
    match position_gap(a, b) {
        Some((sep_arcsec, epoch_gap)) => {
            epoch_gap <= config.epoch_window && sep_arcsec < config.match_radius_arcsec
        }
        None => false,
    }
}

/// Angular separation (arcseconds) and epoch gap between two records, when
/// both carry full positions.
fn position_gap(a: &Target, b: &Target) -> Option<(f64, Duration)> {
    let (Some(ra_a), Some(dec_a), Some(ea)) = (a.ra_deg, a.dec_deg, a.epoch) else {
        return None;
    };
    let (Some(ra_b), Some(dec_b), Some(eb)) = (b.ra_deg, b.dec_deg, b.epoch) else {
        return None;
    };

    let sep_arcsec = angular_separation_deg(
        &RaDec {
            ra: ra_a * RADEG,
            dec: dec_a * RADEG,
        },
        &RaDec {
            ra: ra_b * RADEG,
            dec: dec_b * RADEG,
        },
    ) * ARCSEC_PER_DEG;

    Some((sep_arcsec, (ea - eb).abs()))
}

/// True when two records cannot describe one object even through an
/// intermediate detection: both carry positions, yet lie farther apart (on
/// the sky or in epoch) than two chained matches could span.
fn irreconcilable(a: &Target, b: &Target, config: &MatchConfig) -> bool {
    match position_gap(a, b) {
        Some((sep_arcsec, epoch_gap)) => {
            sep_arcsec > config.match_radius_arcsec * 2.0
                || epoch_gap > config.epoch_window * 2
        }
        None => false,
    }
}

/// Build clusters of mutually (transitively) matching records, applying the
/// conservative split for ambiguous bridge records.
fn build_clusters(records: &[Target], config: &MatchConfig) -> Vec<Vec<usize>> {
    let n = records.len();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, j) in (0..n).tuple_combinations() {
        if records_match(&records[i], &records[j], config) {
            adjacency[i].push(j);
            adjacency[j].push(i);
        }
    }

    let mut clusters = Vec::new();
    let mut seen = vec![false; n];
    for start in 0..n {
        if seen[start] {
            continue;
        }
        let component = collect_component(start, &adjacency, None);
        for &i in &component {
            seen[i] = true;
        }
        split_ambiguous(component, &adjacency, records, config, &mut clusters);
    }
    clusters
}

/// Connected component containing `start`, optionally pretending one vertex
/// does not exist. Output sorted for determinism.
fn collect_component(start: usize, adjacency: &[Vec<usize>], without: Option<usize>) -> Vec<usize> {
    let mut component = Vec::new();
    let mut stack = vec![start];
    let mut visited = BTreeSet::new();
    visited.insert(start);
    while let Some(i) = stack.pop() {
        component.push(i);
        for &j in &adjacency[i] {
            if Some(j) != without && visited.insert(j) {
                stack.push(j);
            }
        }
    }
    component.sort_unstable();
    component
}

/// Detect a bridge record joining otherwise-unlinked groups inside one
/// component; keep it with the larger group and emit the rest as separate
/// clusters. Candidates are probed in designation order so the outcome does
/// not depend on input ordering.
///
/// Disconnecting the component is necessary but not sufficient: the interior
/// of a transitive chain also disconnects it. A record is ambiguous only
/// when it links neighbors that are [`irreconcilable`] with each other, i.e.
/// could not belong to one object even through the bridge's own position.
fn split_ambiguous(
    component: Vec<usize>,
    adjacency: &[Vec<usize>],
    records: &[Target],
    config: &MatchConfig,
    clusters: &mut Vec<Vec<usize>>,
) {
    if component.len() < 3 {
        clusters.push(component);
        return;
    }

    let probe_order: Vec<usize> = component
        .iter()
        .copied()
        .sorted_by(|&a, &b| {
            records[a]
                .designation
                .cmp(&records[b].designation)
                .then(records[a].source.cmp(&records[b].source))
        })
        .collect();

    for &bridge in &probe_order {
        let neighbors: Vec<usize> = adjacency[bridge]
            .iter()
            .copied()
            .filter(|v| component.contains(v))
            .collect();
        if neighbors.len() < 2 {
            continue;
        }

        // Sub-components of the cluster once the bridge is removed.
        let mut parts: Vec<Vec<usize>> = Vec::new();
        let mut assigned = BTreeSet::new();
        assigned.insert(bridge);
        for &v in &component {
            if assigned.contains(&v) {
                continue;
            }
            let part = collect_component(v, adjacency, Some(bridge));
            for &p in &part {
                assigned.insert(p);
            }
            parts.push(part);
        }

        if parts.len() < 2 {
            continue;
        }

        // Chain interiors split their component too; only a pair of
        // cross-part neighbors that cannot be one object marks a true
        // ambiguity.
        let part_of = |v: usize| parts.iter().position(|p| p.contains(&v));
        let conflicting = neighbors
            .iter()
            .copied()
            .tuple_combinations()
            .any(|(x, y)| {
                part_of(x) != part_of(y) && irreconcilable(&records[x], &records[y], config)
            });
        if !conflicting {
            continue;
        }

        // Ambiguous: attach the bridge to the largest part (smallest leading
        // designation on ties) and leave the others independent.
        parts.sort_by(|a, b| {
            b.len()
                .cmp(&a.len())
                .then_with(|| records[a[0]].designation.cmp(&records[b[0]].designation))
        });
        debug!(
            bridge = %records[bridge].designation,
            groups = parts.len(),
            "ambiguous deduplication cluster split conservatively"
        );

        let mut winner = parts.remove(0);
        winner.push(bridge);
        winner.sort_unstable();
        clusters.push(winner);
        clusters.extend(parts);
        return;
    }

    clusters.push(component);
}

/// Fold one cluster into a single enriched target.
///
/// Records are applied update-time ascending (feed priority breaks exact
/// timestamp ties, stronger feed applied last), so the last writer of each
/// present field is the most recent one.
fn merge_cluster<'a>(records: impl Iterator<Item = &'a Target>) -> Target {
    let ordered: Vec<&Target> = records
        .sorted_by(|a, b| {
            a.updated_at
                .cmp(&b.updated_at)
                .then_with(|| b.source.merge_rank().cmp(&a.source.merge_rank()))
                .then_with(|| a.designation.cmp(&b.designation))
        })
        .collect();

    let mut merged = ordered[0].clone();
    for record in &ordered[1..] {
        apply_record(&mut merged, record);
    }

    // The merged record answers to every designation it absorbed.
    for record in &ordered {
        if record.designation != merged.designation {
            merged.aliases.insert(record.designation.clone());
        }
        merged.aliases.extend(record.aliases.iter().cloned());
    }
    merged.aliases.remove(&merged.designation);
    merged
}

/// Overlay `incoming` onto `merged`: present values win, absence never
/// erases, the position triple moves as a unit.
fn apply_record(merged: &mut Target, incoming: &Target) {
    merged.designation = incoming.designation.clone();
    merged.source = incoming.source;
    if incoming.source_url.is_some() {
        merged.source_url = incoming.source_url.clone();
    }

    // A catalog position is only meaningful with its epoch; never mix the
    // coordinates of one record with the epoch of another.
    if let (Some(ra), Some(dec), Some(epoch)) = (incoming.ra_deg, incoming.dec_deg, incoming.epoch)
    {
        merged.ra_deg = Some(ra);
        merged.dec_deg = Some(dec);
        merged.epoch = Some(epoch);
    }

    overlay(&mut merged.mag_v, incoming.mag_v);
    overlay(&mut merged.mag_h, incoming.mag_h);
    overlay(&mut merged.n_obs, incoming.n_obs);
    overlay(&mut merged.arc_days, incoming.arc_days);
    overlay(&mut merged.not_seen_days, incoming.not_seen_days);
    overlay(&mut merged.neo_score, incoming.neo_score);
    overlay(&mut merged.pha_score, incoming.pha_score);
    overlay(&mut merged.impact_prob, incoming.impact_prob);

    merged.updated_at = merged.updated_at.max(incoming.updated_at);
    merged
        .contributing_sources
        .extend(incoming.contributing_sources.iter().copied());
    merged.raw.extend(incoming.raw.iter().cloned());
}

fn overlay<T: Copy>(slot: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *slot = incoming;
    }
}
