use chrono::Duration;

use crate::config::helpers::{parse_bool_env, parse_f64_env, parse_i64_env, parse_string_env};
use crate::error::ConfigError;
use crate::practice::dashboard::StatsOptions;
use crate::practice::dedupe::{
    MatchOptions, MatchWeights, MissingFieldPolicy, validate_threshold,
};
use crate::settings::Settings;

/// Tunables for duplicate detection and dashboard rollups.
#[derive(Debug, Clone, PartialEq)]
pub struct InsightsConfig {
    pub duplicate_threshold: f64,
    pub missing_field_policy: MissingFieldPolicy,
    pub fold_case: bool,
    pub due_soon: Duration,
    pub contract_expiry: Duration,
}

fn parse_missing_field_policy(raw: &str) -> Result<MissingFieldPolicy, ConfigError> {
    MissingFieldPolicy::from_config_value(raw).ok_or_else(|| ConfigError::InvalidValue {
        key: "INSIGHTS_MISSING_FIELD_POLICY".to_string(),
        message: format!("unsupported policy '{}'", raw.trim()),
    })
}

fn validate_positive(key: &str, value: i64) -> Result<i64, ConfigError> {
    if value <= 0 {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("must be greater than 0, got {value}"),
        });
    }
    Ok(value)
}

fn window(key: &str, duration: Option<Duration>) -> Result<Duration, ConfigError> {
    duration.ok_or_else(|| ConfigError::InvalidValue {
        key: key.to_string(),
        message: "window is too large".to_string(),
    })
}

impl InsightsConfig {
    pub fn resolve(settings: &Settings) -> Result<Self, ConfigError> {
        let insights = &settings.insights;

        let duplicate_threshold =
            parse_f64_env("INSIGHTS_DUPLICATE_THRESHOLD", insights.duplicate_threshold)?;
        validate_threshold(duplicate_threshold)?;

        let policy_raw = parse_string_env(
            "INSIGHTS_MISSING_FIELD_POLICY",
            insights.missing_field_policy.clone(),
        )?;

        let due_soon_hours = validate_positive(
            "INSIGHTS_DUE_SOON_HOURS",
            parse_i64_env("INSIGHTS_DUE_SOON_HOURS", insights.due_soon_hours)?,
        )?;
        let contract_expiry_days = validate_positive(
            "INSIGHTS_CONTRACT_EXPIRY_DAYS",
            parse_i64_env("INSIGHTS_CONTRACT_EXPIRY_DAYS", insights.contract_expiry_days)?,
        )?;

        Ok(Self {
            duplicate_threshold,
            missing_field_policy: parse_missing_field_policy(&policy_raw)?,
            fold_case: parse_bool_env("INSIGHTS_FOLD_CASE", insights.fold_case)?,
            due_soon: window("INSIGHTS_DUE_SOON_HOURS", Duration::try_hours(due_soon_hours))?,
            contract_expiry: window(
                "INSIGHTS_CONTRACT_EXPIRY_DAYS",
                Duration::try_days(contract_expiry_days),
            )?,
        })
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            threshold: self.duplicate_threshold,
            weights: MatchWeights::default(),
            missing_fields: self.missing_field_policy,
            fold_case: self.fold_case,
        }
    }

    pub fn stats_options(&self) -> StatsOptions {
        StatsOptions {
            due_soon: self.due_soon,
            contract_expiry: self.contract_expiry,
        }
    }
}
