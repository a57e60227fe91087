//! Quick filters for the clients, processes and tasks lists.
//!
//! Descriptors are plain values: toggling returns a new list and counts come
//! straight from [`AggregateStats`], never from a separate pass.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::practice::dashboard::AggregateStats;
use crate::practice::records::{
    ClientRecord, ClientStatus, ProcessRecord, ProcessStatus, TaskPriority, TaskRecord,
    TaskStatus,
};

/// Dashboard list a filter set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum DashboardModule {
    Clients,
    Processes,
    Tasks,
}

impl DashboardModule {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Processes => "processes",
            Self::Tasks => "tasks",
        }
    }
}

/// Record attribute a filter compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterField {
    Status,
    Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuickFilter {
    pub key: String,
    pub label: String,
    pub field: FilterField,
    pub value: String,
    pub active: bool,
    pub count: usize,
}

impl QuickFilter {
    fn new(key: &str, label: &str, field: FilterField, count: usize) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            field,
            value: key.to_string(),
            active: false,
            count,
        }
    }

    fn matches<T: Filterable + ?Sized>(&self, record: &T) -> bool {
        record.field_value(self.field) == Some(self.value.as_str())
    }
}

/// Records that can be narrowed by quick filters and free-text search.
pub trait Filterable {
    /// Value of `field`, or `None` when the record has no such attribute.
    fn field_value(&self, field: FilterField) -> Option<&str>;

    /// Text searched by the free-text query.
    fn display_fields(&self) -> Vec<&str>;
}

impl Filterable for ClientRecord {
    fn field_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Status => Some(self.status.as_str()),
            FilterField::Priority => None,
        }
    }

    fn display_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        fields.extend(self.email.as_deref());
        fields.extend(self.phone.as_deref());
        fields
    }
}

impl Filterable for ProcessRecord {
    fn field_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Status => Some(self.status.as_str()),
            FilterField::Priority => None,
        }
    }

    fn display_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.number.as_str(), self.title.as_str()];
        fields.extend(self.practice_area.as_deref());
        fields
    }
}

impl Filterable for TaskRecord {
    fn field_value(&self, field: FilterField) -> Option<&str> {
        match field {
            FilterField::Status => Some(self.status.as_str()),
            FilterField::Priority => Some(self.priority.as_str()),
        }
    }

    fn display_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        fields.extend(self.description.as_deref());
        fields.extend(self.assignee.as_deref());
        fields
    }
}

const TASK_PRIORITY_FILTERS: [TaskPriority; 2] = [TaskPriority::High, TaskPriority::Urgent];

/// Fixed filter set for `module`, counts taken from `stats`. All start inactive.
pub fn build_filters(module: DashboardModule, stats: &AggregateStats) -> Vec<QuickFilter> {
    match module {
        DashboardModule::Clients => ClientStatus::ALL
            .iter()
            .map(|status| {
                QuickFilter::new(
                    status.as_str(),
                    status.label(),
                    FilterField::Status,
                    stats.clients.count(*status),
                )
            })
            .collect(),
        DashboardModule::Processes => ProcessStatus::ALL
            .iter()
            .map(|status| {
                QuickFilter::new(
                    status.as_str(),
                    status.label(),
                    FilterField::Status,
                    stats.processes.count(*status),
                )
            })
            .collect(),
        DashboardModule::Tasks => {
            let mut filters: Vec<QuickFilter> = TaskStatus::ALL
                .iter()
                .map(|status| {
                    QuickFilter::new(
                        status.as_str(),
                        status.label(),
                        FilterField::Status,
                        stats.tasks.count(*status),
                    )
                })
                .collect();
            filters.extend(TASK_PRIORITY_FILTERS.iter().map(|priority| {
                QuickFilter::new(
                    priority.as_str(),
                    priority.label(),
                    FilterField::Priority,
                    stats.tasks.count_priority(*priority),
                )
            }));
            filters
        }
    }
}

/// Copy of `filters` with the entry named `key` flipped. Unknown keys leave
/// every entry unchanged.
pub fn toggle_filter(filters: &[QuickFilter], key: &str) -> Vec<QuickFilter> {
    filters
        .iter()
        .map(|filter| {
            let mut next = filter.clone();
            if next.key == key {
                next.active = !next.active;
            }
            next
        })
        .collect()
}

/// Keys of the currently active filters, in descriptor order.
pub fn active_filters(filters: &[QuickFilter]) -> Vec<&str> {
    filters
        .iter()
        .filter(|filter| filter.active)
        .map(|filter| filter.key.as_str())
        .collect()
}

fn matches_query<T: Filterable + ?Sized>(record: &T, needle: &str) -> bool {
    record
        .display_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(needle))
}

/// Records passing every active filter and containing `query`
/// (case-insensitive) in one of their display fields. A blank query matches
/// everything.
pub fn apply_filters<'a, T: Filterable>(
    records: &'a [T],
    filters: &[QuickFilter],
    query: &str,
) -> Vec<&'a T> {
    let active: Vec<&QuickFilter> = filters.iter().filter(|filter| filter.active).collect();
    let needle = query.trim().to_lowercase();

    records
        .iter()
        .filter(|record| active.iter().all(|filter| filter.matches(*record)))
        .filter(|record| needle.is_empty() || matches_query(*record, &needle))
        .collect()
}
