use thiserror::Error;

use crate::target::ProviderId;

/// Crate-wide error type.
///
/// Provider-scoped failures (`ProviderFetch`, `ProviderTimeout`, `ProviderParse`)
/// are isolated at the refresh-cycle boundary and never abort a cycle or a query.
/// `InvalidProfile` is the only variant surfaced to a query caller.
#[derive(Error, Debug)]
pub enum NeoplanError {
    #[error("provider {provider} fetch failed: {reason}")]
    ProviderFetch { provider: ProviderId, reason: String },

    #[error("provider {provider} timed out after {budget_s} s")]
    ProviderTimeout { provider: ProviderId, budget_s: f64 },

    #[error("provider {provider} returned a malformed payload: {reason}")]
    ProviderParse { provider: ProviderId, reason: String },

    #[error("invalid telescope profile: {0}")]
    InvalidProfile(String),

    #[error("system clock unavailable: {0}")]
    ClockError(#[from] hifitime::HifitimeError),
}
