pub mod astro;
pub mod constants;
pub mod dedup;
pub mod neoplan_errors;
pub mod observability;
pub mod provider;
pub mod query;
pub mod refresh;
pub mod scorer;
pub mod snapshot;
pub mod target;
pub mod telescope;
