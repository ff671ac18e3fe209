//! # Target schema and provider identifiers
//!
//! This module defines [`Target`], the normalized record every alert feed is
//! adapted into, and [`ProviderId`], the closed set of feeds the pipeline
//! knows about.
//!
//! ## Conventions
//!
//! - `ra_deg` ∈ [0, 360), `dec_deg` ∈ [-90, 90], both in the same inertial
//!   sky frame, valid at `epoch`.
//! - Every numeric field that a feed may omit is an `Option`: **absence is
//!   never conflated with zero**. A brand-new detection with an unknown arc
//!   carries `arc_days: None`, not `Some(0.0)`.
//! - `raw` retains the untouched per-provider payloads for traceability; the
//!   core never interprets them.
//!
//! ## See also
//! ------------
//! * [`crate::dedup`] – Cross-source matching and merge of `Target` records.
//! * [`crate::telescope::TelescopeProfile`] – Per-query observing constraints.

use std::collections::BTreeSet;

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::constants::{Degree, Magnitude};

/// Identifier of an alert feed known to the pipeline.
///
/// The set is closed on purpose: adapters are selected at startup from this
/// registry, no runtime reflection is involved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// MPC NEO Confirmation Page — the primary candidate list.
    Neocp,
    /// JPL Scout — hazard scoring of NEOCP candidates.
    Scout,
    /// JPL Sentry — objects with a non-zero Earth impact probability.
    Sentry,
}

impl ProviderId {
    /// All feeds, in merge-priority order (highest first).
    pub const ALL: [ProviderId; 3] = [ProviderId::Neocp, ProviderId::Scout, ProviderId::Sentry];

    /// Tie-break priority used by the merge when two values carry the same
    /// update timestamp. Lower is stronger.
    pub(crate) fn merge_rank(&self) -> u8 {
        match self {
            ProviderId::Neocp => 0,
            ProviderId::Scout => 1,
            ProviderId::Sentry => 2,
        }
    }
}

impl std::fmt::Display for ProviderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderId::Neocp => write!(f, "neocp"),
            ProviderId::Scout => write!(f, "scout"),
            ProviderId::Sentry => write!(f, "sentry"),
        }
    }
}

/// One opaque per-provider payload retained on a merged target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawPayload {
    pub source: ProviderId,
    pub payload: serde_json::Value,
}

/// A single NEO / asteroid candidate as known to the system.
///
/// Produced by provider adapters in the common schema, merged across sources
/// by the deduplicator, and consumed read-only by the observability engine
/// and the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Target {
    // Identity
    /// Provider-assigned designation, e.g. `"ZTF10Bb"` or `"2026 HK53"`.
    /// Not guaranteed unique across providers.
    pub designation: String,
    /// Feed that produced (or, after a merge, dominated) this record.
    pub source: ProviderId,
    pub source_url: Option<String>,
    /// Cross-identifications declared by providers for the same physical
    /// object. Union-ed across sources by the merge.
    #[serde(default)]
    pub aliases: BTreeSet<String>,

    // Sky position
    pub ra_deg: Option<Degree>,
    pub dec_deg: Option<Degree>,
    /// Instant the catalog position refers to. Fast movers drift quickly,
    /// so matching rejects position pairs with distant epochs.
    pub epoch: Option<Epoch>,

    // Brightness
    /// Predicted apparent visual magnitude (lower = brighter).
    pub mag_v: Option<Magnitude>,
    /// Absolute magnitude (size proxy).
    pub mag_h: Option<Magnitude>,

    // Orbit quality
    pub n_obs: Option<u32>,
    /// Time span of the contributing observations, in days.
    pub arc_days: Option<f64>,
    /// Days since the object was last observed.
    pub not_seen_days: Option<f64>,

    // Risk scores
    /// 0–100 probability of being a real NEO.
    pub neo_score: Option<f64>,
    /// Potentially-hazardous-asteroid score.
    pub pha_score: Option<f64>,
    /// Earth impact probability in [0, 1].
    pub impact_prob: Option<f64>,

    // Bookkeeping
    pub updated_at: Epoch,
    /// Feeds that matched into this record. Always non-empty.
    pub contributing_sources: BTreeSet<ProviderId>,
    /// Untouched provider payloads, concatenated across merges.
    #[serde(default)]
    pub raw: Vec<RawPayload>,
}

impl Target {
    /// Build a minimal record for one feed. Optional fields start absent and
    /// are filled by the adapter from whatever its native payload carries.
    pub fn new(designation: impl Into<String>, source: ProviderId, updated_at: Epoch) -> Self {
        Target {
            designation: designation.into(),
            source,
            source_url: None,
            aliases: BTreeSet::new(),
            ra_deg: None,
            dec_deg: None,
            epoch: None,
            mag_v: None,
            mag_h: None,
            n_obs: None,
            arc_days: None,
            not_seen_days: None,
            neo_score: None,
            pha_score: None,
            impact_prob: None,
            updated_at,
            contributing_sources: BTreeSet::from([source]),
            raw: Vec::new(),
        }
    }

    /// True when `name` is this record's designation or one of its declared
    /// cross-identifications.
    pub fn answers_to(&self, name: &str) -> bool {
        self.designation == name || self.aliases.contains(name)
    }

    /// True when this record declares the other's designation as an alias,
    /// or vice versa (matching rule (b) of the deduplicator).
    pub(crate) fn declares_alias_of(&self, other: &Target) -> bool {
        self.aliases.contains(&other.designation) || other.aliases.contains(&self.designation)
    }
}
