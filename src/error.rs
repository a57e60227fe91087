//! Error types for the insights engine.

use std::path::PathBuf;

use uuid::Uuid;

/// Configuration resolution errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("failed to read settings file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path:?}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

/// Precondition violations found when validating records at the boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("client {id} has negative potential value {value}")]
    NegativePotentialValue { id: Uuid, value: String },

    #[error("contract {id} has negative monthly value {value}")]
    NegativeMonthlyValue { id: Uuid, value: String },

    #[error("duplicate {collection} id {id}")]
    DuplicateId { collection: &'static str, id: Uuid },
}

/// Errors while loading a collection snapshot.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid snapshot JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("snapshot failed validation: {0}")]
    Invalid(#[from] RecordError),
}
