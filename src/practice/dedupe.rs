//! Pairwise duplicate detection over client records.
//!
//! Every unordered pair is compared, so a pass is O(n²) in the number of
//! clients. That is comfortable below a few thousand records; larger books
//! should be bucketed (name prefix, normalized phone) before calling in.
//! Results are advisory: nothing here merges or edits a record.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ConfigError;
use crate::practice::records::ClientRecord;
use crate::practice::similarity::{fold_case, normalize_phone, similarity};

pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 0.8;
const LARGE_INPUT_WARNING: usize = 5_000;

/// Per-field weights of the composite score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchWeights {
    pub name: f64,
    pub email: f64,
    pub phone: f64,
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self {
            name: 0.4,
            email: 0.3,
            phone: 0.3,
        }
    }
}

/// What happens to the weight of an email/phone term that cannot be compared
/// because one side is missing it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingFieldPolicy {
    /// Drop the term. The composite is the plain weighted sum, so sparse
    /// records top out below 1.0.
    #[default]
    Omit,
    /// Divide by the weight of the terms that were compared.
    Redistribute,
}

impl MissingFieldPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Omit => "omit",
            Self::Redistribute => "redistribute",
        }
    }

    pub fn from_config_value(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "omit" => Some(Self::Omit),
            "redistribute" => Some(Self::Redistribute),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchOptions {
    pub threshold: f64,
    pub weights: MatchWeights,
    pub missing_fields: MissingFieldPolicy,
    pub fold_case: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_DUPLICATE_THRESHOLD,
            weights: MatchWeights::default(),
            missing_fields: MissingFieldPolicy::Omit,
            fold_case: false,
        }
    }
}

impl MatchOptions {
    /// Default options with a caller-chosen threshold in [0, 1].
    pub fn with_threshold(threshold: f64) -> Result<Self, ConfigError> {
        validate_threshold(threshold)?;
        Ok(Self {
            threshold,
            ..Self::default()
        })
    }
}

/// Thresholds outside [0, 1] (or NaN) are a configuration error.
pub fn validate_threshold(threshold: f64) -> Result<(), ConfigError> {
    if !threshold.is_finite() || !(0.0..=1.0).contains(&threshold) {
        return Err(ConfigError::InvalidValue {
            key: "INSIGHTS_DUPLICATE_THRESHOLD".to_string(),
            message: format!("threshold must be within [0, 1], got {threshold}"),
        });
    }
    Ok(())
}

/// Field similarities behind a composite score. `None` means the field was
/// not compared.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldScores {
    pub name: f64,
    pub email: Option<f64>,
    pub phone: Option<f64>,
}

/// Two client ids that probably refer to the same person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateCandidate {
    pub id_a: Uuid,
    pub id_b: Uuid,
    pub score: f64,
    pub fields: FieldScores,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|v| !v.is_empty())
}

fn compare_text(a: &str, b: &str, fold: bool) -> f64 {
    if fold {
        similarity(&fold_case(a), &fold_case(b))
    } else {
        similarity(a, b)
    }
}

/// Per-field similarities for one pair.
pub fn field_scores(a: &ClientRecord, b: &ClientRecord, options: &MatchOptions) -> FieldScores {
    let name = compare_text(&a.name, &b.name, options.fold_case);

    let email = match (present(a.email.as_ref()), present(b.email.as_ref())) {
        (Some(ea), Some(eb)) => Some(compare_text(ea, eb, options.fold_case)),
        _ => None,
    };

    let phone = match (present(a.phone.as_ref()), present(b.phone.as_ref())) {
        (Some(pa), Some(pb)) => Some(similarity(&normalize_phone(pa), &normalize_phone(pb))),
        _ => None,
    };

    FieldScores { name, email, phone }
}

fn composite(fields: &FieldScores, options: &MatchOptions) -> f64 {
    let weights = &options.weights;
    let mut total = fields.name * weights.name;
    let mut compared_weight = weights.name;

    if let Some(email) = fields.email {
        total += email * weights.email;
        compared_weight += weights.email;
    }
    if let Some(phone) = fields.phone {
        total += phone * weights.phone;
        compared_weight += weights.phone;
    }

    match options.missing_fields {
        MissingFieldPolicy::Omit => total,
        MissingFieldPolicy::Redistribute if compared_weight > 0.0 => total / compared_weight,
        MissingFieldPolicy::Redistribute => 0.0,
    }
}

/// Composite score for one pair.
pub fn pair_score(a: &ClientRecord, b: &ClientRecord, options: &MatchOptions) -> f64 {
    composite(&field_scores(a, b, options), options)
}

/// Pairs whose composite score exceeds `threshold`, using default weights.
pub fn find_duplicate_candidates(
    records: &[ClientRecord],
    threshold: f64,
) -> Vec<DuplicateCandidate> {
    find_duplicate_candidates_with(
        records,
        &MatchOptions {
            threshold,
            ..MatchOptions::default()
        },
    )
}

/// Pairs whose composite score strictly exceeds `options.threshold`, sorted
/// by score descending. Equal scores keep input pair order.
pub fn find_duplicate_candidates_with(
    records: &[ClientRecord],
    options: &MatchOptions,
) -> Vec<DuplicateCandidate> {
    if records.len() < 2 {
        return Vec::new();
    }
    if records.len() > LARGE_INPUT_WARNING {
        tracing::warn!(
            records = records.len(),
            "Duplicate scan over a large client book; consider bucketing first"
        );
    }

    let mut candidates = Vec::new();
    for (i, a) in records.iter().enumerate() {
        for b in &records[i + 1..] {
            let fields = field_scores(a, b, options);
            let score = composite(&fields, options);
            if score > options.threshold {
                candidates.push(DuplicateCandidate {
                    id_a: a.id,
                    id_b: b.id,
                    score,
                    fields,
                });
            }
        }
    }

    candidates.sort_by(|x, y| y.score.total_cmp(&x.score));

    tracing::debug!(
        records = records.len(),
        candidates = candidates.len(),
        threshold = options.threshold,
        "Duplicate scan complete"
    );
    candidates
}
