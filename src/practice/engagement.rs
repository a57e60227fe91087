//! Client engagement scoring.
//!
//! A score is a weighted blend of four components, each clamped to [0, 100]
//! before weighting:
//!
//! | component | raw value                              | weight |
//! |-----------|----------------------------------------|--------|
//! | recency   | `100 - days_since_last_interaction*10` | 0.30   |
//! | processes | `linked_process_ids * 25`              | 0.25   |
//! | contracts | `linked_contract_ids * 50`             | 0.25   |
//! | value     | `potential_value / 1000 * 2`           | 0.20   |

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::practice::records::ClientRecord;

const RECENCY_WEIGHT: f64 = 0.30;
const PROCESS_WEIGHT: f64 = 0.25;
const CONTRACT_WEIGHT: f64 = 0.25;
const VALUE_WEIGHT: f64 = 0.20;

const RECENCY_DECAY_PER_DAY: f64 = 10.0;
const POINTS_PER_PROCESS: f64 = 25.0;
const POINTS_PER_CONTRACT: f64 = 50.0;

const HOT_FLOOR: u8 = 70;
const WARM_FLOOR: u8 = 40;

/// Bounded components of one engagement score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementBreakdown {
    pub recency: f64,
    pub processes: f64,
    pub contracts: f64,
    pub value: f64,
    pub score: u8,
}

/// Coarse bucket of an engagement score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EngagementBand {
    Cold,
    Warm,
    Hot,
}

impl EngagementBand {
    pub const ALL: [Self; 3] = [Self::Hot, Self::Warm, Self::Cold];

    pub fn from_score(score: u8) -> Self {
        if score >= HOT_FLOOR {
            Self::Hot
        } else if score >= WARM_FLOOR {
            Self::Warm
        } else {
            Self::Cold
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Warm => "warm",
            Self::Hot => "hot",
        }
    }
}

/// Whole days elapsed, truncated toward zero. Negative for future timestamps.
fn days_since(at: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    now.signed_duration_since(at).num_days()
}

fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

/// A future-dated interaction saturates recency at 100 instead of being
/// rejected.
fn recency_component(last_interaction_at: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    let days = days_since(last_interaction_at, now) as f64;
    (100.0 - days * RECENCY_DECAY_PER_DAY).clamp(0.0, 100.0)
}

fn count_component(count: usize, points_each: f64) -> f64 {
    (count as f64 * points_each).min(100.0)
}

fn value_component(potential_value: Decimal) -> f64 {
    let value = decimal_to_f64(potential_value).max(0.0);
    (value / 1000.0 * 2.0).min(100.0)
}

pub fn engagement_breakdown(record: &ClientRecord, now: DateTime<Utc>) -> EngagementBreakdown {
    let recency = recency_component(record.last_interaction_at, now);
    let processes = count_component(record.linked_process_ids.len(), POINTS_PER_PROCESS);
    let contracts = count_component(record.linked_contract_ids.len(), POINTS_PER_CONTRACT);
    let value = value_component(record.potential_value);

    let weighted = recency * RECENCY_WEIGHT
        + processes * PROCESS_WEIGHT
        + contracts * CONTRACT_WEIGHT
        + value * VALUE_WEIGHT;
    let score = weighted.round().clamp(0.0, 100.0) as u8;

    EngagementBreakdown {
        recency,
        processes,
        contracts,
        value,
        score,
    }
}

/// Engagement score in [0, 100] as of `now`.
pub fn engagement_score(record: &ClientRecord, now: DateTime<Utc>) -> u8 {
    engagement_breakdown(record, now).score
}

/// Scores for every client, in input order.
pub fn score_clients(clients: &[ClientRecord], now: DateTime<Utc>) -> Vec<(Uuid, u8)> {
    clients
        .iter()
        .map(|client| (client.id, engagement_score(client, now)))
        .collect()
}
