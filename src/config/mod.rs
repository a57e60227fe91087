//! Runtime configuration: settings file values with environment overrides.

pub(crate) mod helpers;
mod insights;

pub use insights::InsightsConfig;
