//! Read-side record shapes delivered by the CRM store.
//!
//! The insights engine never mutates these; every analysis pass borrows the
//! caller's current collections and returns fresh derived values.

use std::collections::{BTreeSet, HashSet};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RecordError;

/// Relationship state of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    Active,
    Vip,
    Prospect,
    Delinquent,
    Inactive,
    Negotiating,
}

impl ClientStatus {
    pub const ALL: [Self; 6] = [
        Self::Active,
        Self::Vip,
        Self::Prospect,
        Self::Delinquent,
        Self::Inactive,
        Self::Negotiating,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Vip => "vip",
            Self::Prospect => "prospect",
            Self::Delinquent => "delinquent",
            Self::Inactive => "inactive",
            Self::Negotiating => "negotiating",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Vip => "VIP",
            Self::Prospect => "Prospect",
            Self::Delinquent => "Delinquent",
            Self::Inactive => "Inactive",
            Self::Negotiating => "Negotiating",
        }
    }
}

/// Lifecycle state of a legal process (case / proceeding).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessStatus {
    Active,
    Pending,
    Suspended,
    Concluded,
    Archived,
}

impl ProcessStatus {
    pub const ALL: [Self; 5] = [
        Self::Active,
        Self::Pending,
        Self::Suspended,
        Self::Concluded,
        Self::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Suspended => "suspended",
            Self::Concluded => "concluded",
            Self::Archived => "archived",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Active => "Active",
            Self::Pending => "Pending",
            Self::Suspended => "Suspended",
            Self::Concluded => "Concluded",
            Self::Archived => "Archived",
        }
    }

    /// Closed processes no longer have actionable deadlines.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::Concluded | Self::Archived)
    }
}

/// Contract state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Draft,
    Active,
    Suspended,
    Expired,
    Terminated,
}

impl ContractStatus {
    pub const ALL: [Self; 5] = [
        Self::Draft,
        Self::Active,
        Self::Suspended,
        Self::Expired,
        Self::Terminated,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Expired => "expired",
            Self::Terminated => "terminated",
        }
    }
}

/// Task state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Blocked,
    Done,
    Cancelled,
}

impl TaskStatus {
    pub const ALL: [Self; 5] = [
        Self::Todo,
        Self::InProgress,
        Self::Blocked,
        Self::Done,
        Self::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Done => "done",
            Self::Cancelled => "cancelled",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Todo => "To do",
            Self::InProgress => "In progress",
            Self::Blocked => "Blocked",
            Self::Done => "Done",
            Self::Cancelled => "Cancelled",
        }
    }

    pub fn is_closed(self) -> bool {
        matches!(self, Self::Done | Self::Cancelled)
    }
}

/// Task priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

impl TaskPriority {
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Urgent];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "Low priority",
            Self::Medium => "Medium priority",
            Self::High => "High priority",
            Self::Urgent => "Urgent",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub status: ClientStatus,
    pub last_interaction_at: DateTime<Utc>,
    #[serde(default)]
    pub linked_process_ids: BTreeSet<Uuid>,
    #[serde(default)]
    pub linked_contract_ids: BTreeSet<Uuid>,
    #[serde(default)]
    pub potential_value: Decimal,
}

impl ClientRecord {
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.potential_value.is_sign_negative() && !self.potential_value.is_zero() {
            return Err(RecordError::NegativePotentialValue {
                id: self.id,
                value: self.potential_value.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessRecord {
    pub id: Uuid,
    pub number: String,
    pub title: String,
    #[serde(default)]
    pub client_id: Option<Uuid>,
    pub status: ProcessStatus,
    #[serde(default)]
    pub next_deadline_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub practice_area: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractRecord {
    pub id: Uuid,
    pub client_id: Uuid,
    pub title: String,
    pub status: ContractStatus,
    #[serde(default)]
    pub monthly_value: Decimal,
    #[serde(default)]
    pub ends_at: Option<DateTime<Utc>>,
}

impl ContractRecord {
    pub fn validate(&self) -> Result<(), RecordError> {
        if self.monthly_value.is_sign_negative() && !self.monthly_value.is_zero() {
            return Err(RecordError::NegativeMonthlyValue {
                id: self.id,
                value: self.monthly_value.to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub process_id: Option<Uuid>,
}

/// Reject the first id that appears twice in `ids`.
pub(crate) fn ensure_unique_ids(
    collection: &'static str,
    ids: impl IntoIterator<Item = Uuid>,
) -> Result<(), RecordError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(RecordError::DuplicateId { collection, id });
        }
    }
    Ok(())
}
