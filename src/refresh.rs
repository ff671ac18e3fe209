//! # Refresh orchestrator
//!
//! Drives the periodic ingestion cycle:
//!
//! ```text
//! idle → fetching (all feeds, concurrently, each under its own timeout)
//!      → merging  (deduplicator over fresh ∪ previous snapshot)
//!      → publishing (one atomic swap)
//!      → idle
//! ```
//!
//! Failure isolation is the orchestrator's whole job: a feed that times out,
//! errors, or returns garbage contributes nothing this cycle and gets its
//! `last_error` recorded, while the remaining feeds proceed normally. Only
//! when **every** feed fails does the cycle republish the previous target
//! set untouched (stale but valid) instead of an artificially empty one.
//!
//! Exactly one task runs cycles; a tick that would overlap an in-flight
//! cycle is skipped, never queued. Shutdown mid-cycle abandons the in-flight
//! fetches without publishing.

use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use hifitime::Epoch;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::dedup::{dedupe, MatchConfig};
use crate::neoplan_errors::NeoplanError;
use crate::provider::ProviderAdapter;
use crate::snapshot::{Snapshot, SnapshotStore, SourceHealth};
use crate::target::{ProviderId, Target};

/// Cycle cadence and per-feed fetch budget.
#[derive(Debug, Clone, Copy)]
pub struct RefreshConfig {
    /// Time between cycle starts.
    pub interval: Duration,
    /// Budget granted to each feed's fetch, enforced by the orchestrator.
    pub provider_timeout: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            interval: Duration::from_secs(5 * 60),
            provider_timeout: Duration::from_secs(10),
        }
    }
}

/// The only writer of [`Snapshot`]s.
pub struct RefreshOrchestrator {
    store: Arc<SnapshotStore>,
    providers: Vec<Arc<dyn ProviderAdapter>>,
    config: RefreshConfig,
    match_config: MatchConfig,
}

impl RefreshOrchestrator {
    /// Wire the orchestrator to its snapshot store and feed registry.
    pub fn new(
        store: Arc<SnapshotStore>,
        providers: Vec<Arc<dyn ProviderAdapter>>,
        config: RefreshConfig,
        match_config: MatchConfig,
    ) -> Self {
        RefreshOrchestrator {
            store,
            providers,
            config,
            match_config,
        }
    }

    /// Run cycles until `shutdown` fires.
    ///
    /// The loop owns the cadence: one `tokio` interval with skipped (never
    /// queued) missed ticks, one cycle at a time. A shutdown signal received
    /// mid-cycle cancels the in-flight fetches; the last fully published
    /// snapshot remains authoritative.
    pub async fn run(self, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(self.config.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    tokio::select! {
                        result = self.run_cycle() => {
                            if let Err(err) = result {
                                warn!(%err, "refresh cycle failed");
                            }
                        }
                        _ = shutdown.changed() => {
                            info!("shutdown mid-cycle, abandoning in-flight fetches");
                            return;
                        }
                    }
                }
                _ = shutdown.changed() => {
                    info!("refresh loop stopped");
                    return;
                }
            }
        }
    }

    /// Execute one full cycle: fetch → merge → publish.
    ///
    /// Public so a caller can force an immediate refresh (e.g. at startup,
    /// before the first tick) and so tests can drive cycles directly.
    pub async fn run_cycle(&self) -> Result<(), NeoplanError> {
        let now = Epoch::now()?;
        let previous = self.store.current();

        // Fan out: every feed fetches concurrently under its own budget, so
        // one slow feed never delays the others.
        let mut handles = Vec::with_capacity(self.providers.len());
        for provider in &self.providers {
            let provider = Arc::clone(provider);
            let budget = self.config.provider_timeout;
            let id = provider.id();
            handles.push((
                id,
                tokio::spawn(async move {
                    match tokio::time::timeout(budget, provider.fetch(budget)).await {
                        Ok(result) => result,
                        Err(_) => Err(NeoplanError::ProviderTimeout {
                            provider: id,
                            budget_s: budget.as_secs_f64(),
                        }),
                    }
                }),
            ));
        }

        let mut fresh: Vec<Target> = Vec::new();
        let mut failed: BTreeSet<ProviderId> = BTreeSet::new();
        let mut sources = previous.sources.clone();

        for (id, handle) in handles {
            let outcome = handle.await.unwrap_or_else(|join_err| {
                Err(NeoplanError::ProviderFetch {
                    provider: id,
                    reason: format!("fetch task aborted: {join_err}"),
                })
            });
            let health = sources.entry(id).or_insert_with(SourceHealth::default);
            match outcome {
                Ok(records) => {
                    info!(provider = %id, count = records.len(), "fetched");
                    fresh.extend(records);
                    health.last_success_at = Some(now);
                    health.last_error = None;
                }
                Err(err) => {
                    warn!(provider = %id, %err, "provider failed, contribution empty this cycle");
                    failed.insert(id);
                    health.last_error = Some(err.to_string());
                }
            }
        }

        if failed.len() == self.providers.len() && !self.providers.is_empty() {
            // Total outage: keep serving the previous targets, surface the
            // staleness through the untouched publish timestamp and the
            // per-feed errors.
            warn!("all providers failed; republishing previous snapshot as stale");
            self.store.publish(Snapshot {
                published_at: previous.published_at,
                targets: previous.targets.clone(),
                sources,
            });
            return Ok(());
        }

        let targets = dedupe(fresh, &previous.targets, &failed, &self.match_config);
        info!(
            targets = targets.len(),
            failed_providers = failed.len(),
            "publishing snapshot"
        );
        self.store.publish(Snapshot {
            published_at: now,
            targets,
            sources,
        });
        Ok(())
    }
}
