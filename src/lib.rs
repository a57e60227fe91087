//! Client deduplication, engagement scoring and dashboard rollups for
//! legal-practice CRM data.
//!
//! Every analysis entry point is a pure function of the collections and the
//! `now` timestamp it is given. The crate holds no state between calls.

pub mod config;
pub mod error;
pub mod practice;
pub mod report;
pub mod settings;

pub use config::InsightsConfig;
pub use error::{ConfigError, RecordError, SnapshotError};
pub use settings::Settings;
