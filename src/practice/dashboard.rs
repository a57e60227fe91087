//! Dashboard rollups over the current collection snapshot.
//!
//! Nothing is cached: callers recompute whenever a collection changes and pass
//! the same `now` for every figure in a pass.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::practice::engagement::{EngagementBand, engagement_score};
use crate::practice::records::{
    ClientRecord, ClientStatus, ContractRecord, ContractStatus, ProcessRecord, ProcessStatus,
    TaskPriority, TaskRecord, TaskStatus,
};

pub const DEFAULT_DUE_SOON_HOURS: i64 = 24;
pub const DEFAULT_CONTRACT_EXPIRY_DAYS: i64 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsOptions {
    /// Open items with a deadline in `[now, now + due_soon]` count as due soon.
    pub due_soon: Duration,
    /// Active contracts ending in `[now, now + contract_expiry]` count as expiring.
    pub contract_expiry: Duration,
}

impl Default for StatsOptions {
    fn default() -> Self {
        Self {
            due_soon: Duration::hours(DEFAULT_DUE_SOON_HOURS),
            contract_expiry: Duration::days(DEFAULT_CONTRACT_EXPIRY_DAYS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientStats {
    pub total: usize,
    pub by_status: BTreeMap<ClientStatus, usize>,
    pub by_engagement: BTreeMap<EngagementBand, usize>,
    pub mean_engagement: f64,
}

impl ClientStats {
    pub fn count(&self, status: ClientStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStats {
    pub total: usize,
    pub by_status: BTreeMap<ProcessStatus, usize>,
    pub due_within_window: usize,
    pub overdue: usize,
}

impl ProcessStats {
    pub fn count(&self, status: ProcessStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractStats {
    pub total: usize,
    pub by_status: BTreeMap<ContractStatus, usize>,
    pub active_monthly_value: Decimal,
    pub ticket_average: Decimal,
    pub expiring_soon: usize,
}

impl ContractStats {
    pub fn count(&self, status: ContractStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub by_status: BTreeMap<TaskStatus, usize>,
    pub by_priority: BTreeMap<TaskPriority, usize>,
    pub due_within_window: usize,
    pub overdue: usize,
    /// Done tasks as a percentage of non-cancelled tasks.
    pub completion_rate: f64,
}

impl TaskStats {
    pub fn count(&self, status: TaskStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    pub fn count_priority(&self, priority: TaskPriority) -> usize {
        self.by_priority.get(&priority).copied().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateStats {
    pub generated_at: DateTime<Utc>,
    pub clients: ClientStats,
    pub processes: ProcessStats,
    pub contracts: ContractStats,
    pub tasks: TaskStats,
}

fn zeroed<K: Ord + Copy>(keys: &[K]) -> BTreeMap<K, usize> {
    keys.iter().map(|key| (*key, 0usize)).collect()
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct DeadlineCounts {
    due_within_window: usize,
    overdue: usize,
}

impl DeadlineCounts {
    fn record(&mut self, deadline: Option<DateTime<Utc>>, now: DateTime<Utc>, window: Duration) {
        let Some(deadline) = deadline else {
            return;
        };
        if deadline < now {
            self.overdue += 1;
        } else if deadline.signed_duration_since(now) <= window {
            self.due_within_window += 1;
        }
    }
}

fn client_stats(clients: &[ClientRecord], now: DateTime<Utc>) -> ClientStats {
    let mut by_status = zeroed(&ClientStatus::ALL);
    let mut by_engagement = zeroed(&EngagementBand::ALL);
    let mut score_sum = 0u64;

    for client in clients {
        *by_status.entry(client.status).or_insert(0) += 1;
        let score = engagement_score(client, now);
        *by_engagement
            .entry(EngagementBand::from_score(score))
            .or_insert(0) += 1;
        score_sum += u64::from(score);
    }

    let mean_engagement = if clients.is_empty() {
        0.0
    } else {
        score_sum as f64 / clients.len() as f64
    };

    ClientStats {
        total: clients.len(),
        by_status,
        by_engagement,
        mean_engagement,
    }
}

fn process_stats(
    processes: &[ProcessRecord],
    now: DateTime<Utc>,
    window: Duration,
) -> ProcessStats {
    let mut by_status = zeroed(&ProcessStatus::ALL);
    let mut deadlines = DeadlineCounts::default();

    for process in processes {
        *by_status.entry(process.status).or_insert(0) += 1;
        if !process.status.is_closed() {
            deadlines.record(process.next_deadline_at, now, window);
        }
    }

    ProcessStats {
        total: processes.len(),
        by_status,
        due_within_window: deadlines.due_within_window,
        overdue: deadlines.overdue,
    }
}

fn contract_stats(
    contracts: &[ContractRecord],
    now: DateTime<Utc>,
    expiry_window: Duration,
) -> ContractStats {
    let mut by_status = zeroed(&ContractStatus::ALL);
    let mut active_count = 0usize;
    let mut active_monthly_value = Decimal::ZERO;
    let mut expiring_soon = 0usize;

    for contract in contracts {
        *by_status.entry(contract.status).or_insert(0) += 1;
        if contract.status != ContractStatus::Active {
            continue;
        }
        active_count += 1;
        active_monthly_value = match active_monthly_value.checked_add(contract.monthly_value) {
            Some(sum) => sum,
            None => {
                tracing::warn!(
                    contract = %contract.id,
                    "Active monthly value overflowed; saturating"
                );
                active_monthly_value.saturating_add(contract.monthly_value)
            }
        };
        if let Some(ends_at) = contract.ends_at
            && ends_at >= now
            && ends_at.signed_duration_since(now) <= expiry_window
        {
            expiring_soon += 1;
        }
    }

    let ticket_average = if active_count == 0 {
        Decimal::ZERO
    } else {
        (active_monthly_value / Decimal::from(active_count)).round_dp(2)
    };

    ContractStats {
        total: contracts.len(),
        by_status,
        active_monthly_value: active_monthly_value.round_dp(2),
        ticket_average,
        expiring_soon,
    }
}

fn task_stats(tasks: &[TaskRecord], now: DateTime<Utc>, window: Duration) -> TaskStats {
    let mut by_status = zeroed(&TaskStatus::ALL);
    let mut by_priority = zeroed(&TaskPriority::ALL);
    let mut deadlines = DeadlineCounts::default();

    for task in tasks {
        *by_status.entry(task.status).or_insert(0) += 1;
        *by_priority.entry(task.priority).or_insert(0) += 1;
        if !task.status.is_closed() {
            deadlines.record(task.due_at, now, window);
        }
    }

    let done = by_status.get(&TaskStatus::Done).copied().unwrap_or(0);
    let cancelled = by_status.get(&TaskStatus::Cancelled).copied().unwrap_or(0);
    let countable = tasks.len() - cancelled;
    let completion_rate = if countable == 0 {
        0.0
    } else {
        done as f64 / countable as f64 * 100.0
    };

    TaskStats {
        total: tasks.len(),
        by_status,
        by_priority,
        due_within_window: deadlines.due_within_window,
        overdue: deadlines.overdue,
        completion_rate,
    }
}

/// Rollups with the default 24h due-soon and 30-day contract expiry windows.
pub fn compute_stats(
    clients: &[ClientRecord],
    processes: &[ProcessRecord],
    contracts: &[ContractRecord],
    tasks: &[TaskRecord],
    now: DateTime<Utc>,
) -> AggregateStats {
    compute_stats_with(
        clients,
        processes,
        contracts,
        tasks,
        now,
        &StatsOptions::default(),
    )
}

pub fn compute_stats_with(
    clients: &[ClientRecord],
    processes: &[ProcessRecord],
    contracts: &[ContractRecord],
    tasks: &[TaskRecord],
    now: DateTime<Utc>,
    options: &StatsOptions,
) -> AggregateStats {
    let stats = AggregateStats {
        generated_at: now,
        clients: client_stats(clients, now),
        processes: process_stats(processes, now, options.due_soon),
        contracts: contract_stats(contracts, now, options.contract_expiry),
        tasks: task_stats(tasks, now, options.due_soon),
    };

    tracing::debug!(
        clients = stats.clients.total,
        processes = stats.processes.total,
        contracts = stats.contracts.total,
        tasks = stats.tasks.total,
        "Computed dashboard stats"
    );
    stats
}
