//! File-backed settings.
//!
//! Settings are the persisted defaults; [`crate::config`] layers environment
//! overrides on top and validates the result.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub insights: InsightsSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightsSettings {
    pub duplicate_threshold: f64,
    pub missing_field_policy: String,
    pub fold_case: bool,
    pub due_soon_hours: i64,
    pub contract_expiry_days: i64,
}

impl Default for InsightsSettings {
    fn default() -> Self {
        Self {
            duplicate_threshold: crate::practice::dedupe::DEFAULT_DUPLICATE_THRESHOLD,
            missing_field_policy: "omit".to_string(),
            fold_case: false,
            due_soon_hours: crate::practice::dashboard::DEFAULT_DUE_SOON_HOURS,
            contract_expiry_days: crate::practice::dashboard::DEFAULT_CONTRACT_EXPIRY_DAYS,
        }
    }
}

impl Settings {
    pub fn from_toml_str(raw: &str, origin: &Path) -> Result<Self, ConfigError> {
        toml::from_str(raw).map_err(|e| ConfigError::Parse {
            path: origin.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Load settings from `path`. A missing file yields the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(raw) => Self::from_toml_str(&raw, path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No settings file at {:?}; using defaults", path);
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::Path;

    use super::Settings;
    use crate::error::ConfigError;

    #[test]
    fn partial_table_keeps_other_defaults() {
        let settings = Settings::from_toml_str(
            "[insights]\nduplicate_threshold = 0.75\n",
            Path::new("inline.toml"),
        )
        .expect("valid toml");
        assert_eq!(settings.insights.duplicate_threshold, 0.75);
        assert_eq!(settings.insights.due_soon_hours, 24);
        assert_eq!(settings.insights.missing_field_policy, "omit");
    }

    #[test]
    fn missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("temp dir");
        let settings = Settings::load(&dir.path().join("absent.toml")).expect("defaults");
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[insights]\nfold_case = true\ncontract_expiry_days = 60")
            .expect("write settings");
        let settings = Settings::load(file.path()).expect("settings");
        assert!(settings.insights.fold_case);
        assert_eq!(settings.insights.contract_expiry_days, 60);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Settings::from_toml_str("[insights\n", Path::new("bad.toml"))
            .expect_err("must fail");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
