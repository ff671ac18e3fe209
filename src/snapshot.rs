//! # Snapshot store
//!
//! The single point of truth readers consult: a process-wide, versioned,
//! **immutable-once-published** collection of merged targets plus per-feed
//! freshness metadata.
//!
//! Publishing is one atomic pointer swap ([`arc_swap::ArcSwap`]): a reader
//! either sees the old snapshot in full or the new one in full, never a mix.
//! Superseded snapshots are dropped when the last reader releases its `Arc`.
//! The refresh orchestrator is the only writer.

use std::collections::BTreeMap;
use std::sync::Arc;

use arc_swap::ArcSwap;
use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use crate::target::{ProviderId, Target};

/// Per-feed freshness metadata carried by every snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceHealth {
    /// Last cycle in which this feed contributed records.
    pub last_success_at: Option<Epoch>,
    /// Most recent failure, cleared on the next success.
    pub last_error: Option<String>,
}

/// An immutable, timestamped collection of merged targets.
///
/// `published_at` is the instant the snapshot was built from fresh data;
/// a cycle in which every feed fails republishes the previous target set
/// with this timestamp left untouched, so staleness stays visible.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub published_at: Epoch,
    pub targets: Vec<Target>,
    pub sources: BTreeMap<ProviderId, SourceHealth>,
}

impl Snapshot {
    /// The pre-first-cycle snapshot: no targets, no feed has reported yet.
    pub fn empty(providers: impl IntoIterator<Item = ProviderId>, at: Epoch) -> Self {
        Snapshot {
            published_at: at,
            targets: Vec::new(),
            sources: providers
                .into_iter()
                .map(|id| (id, SourceHealth::default()))
                .collect(),
        }
    }
}

/// Holder of the currently published [`Snapshot`].
///
/// Readers call [`current`](SnapshotStore::current) and keep the returned
/// `Arc` for the duration of their query; the orchestrator replaces the
/// snapshot with [`publish`](SnapshotStore::publish). No lock is ever held
/// across a query.
#[derive(Debug)]
pub struct SnapshotStore {
    current: ArcSwap<Snapshot>,
}

impl SnapshotStore {
    pub fn new(initial: Snapshot) -> Self {
        SnapshotStore {
            current: ArcSwap::from_pointee(initial),
        }
    }

    /// The currently published snapshot. Cheap; safe to call from any task.
    pub fn current(&self) -> Arc<Snapshot> {
        self.current.load_full()
    }

    /// Atomically replace the published snapshot.
    pub fn publish(&self, snapshot: Snapshot) {
        self.current.store(Arc::new(snapshot));
    }
}
