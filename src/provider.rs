//! # Provider adapter contract
//!
//! Every alert feed (NEOCP, Scout, Sentry, …) is adapted behind
//! [`ProviderAdapter`]: a callable that, given a timeout budget, either
//! returns records already normalized into the common [`Target`] schema or a
//! typed failure. Network and payload-parsing concerns live entirely inside
//! the adapters; the pipeline core only ever sees the common schema, with
//! unknown fields left absent rather than guessed.
//!
//! Adapters are registered at startup from the closed
//! [`ProviderId`](crate::target::ProviderId) set — selection is plain
//! dispatch over trait objects, no runtime reflection.

use std::time::Duration;

use async_trait::async_trait;

use crate::neoplan_errors::NeoplanError;
use crate::target::{ProviderId, Target};

/// One alert feed, as seen by the refresh orchestrator.
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which feed this adapter serves.
    fn id(&self) -> ProviderId;

    /// Poll the feed once and return the normalized records.
    ///
    /// `budget` is the time the orchestrator grants this fetch; the
    /// orchestrator also enforces it externally, so an adapter that ignores
    /// the budget is cancelled rather than trusted.
    ///
    /// A malformed individual record should be skipped (and logged) by the
    /// adapter, not fail the whole batch.
    async fn fetch(&self, budget: Duration) -> Result<Vec<Target>, NeoplanError>;
}
