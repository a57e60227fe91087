//! Report builders behind the CLI subcommands.
//!
//! Each function takes a loaded [`Snapshot`] plus resolved configuration and
//! returns a serializable value; the binary only parses arguments and prints.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::config::InsightsConfig;
use crate::error::ConfigError;
use crate::practice::dedupe::validate_threshold;
use crate::practice::{
    AggregateStats, ClientRecord, DashboardModule, DuplicateCandidate, EngagementBand,
    EngagementBreakdown, ProcessRecord, QuickFilter, Snapshot, TaskRecord, active_filters,
    apply_filters, build_filters, compute_stats_with, engagement_breakdown,
    find_duplicate_candidates_with, toggle_filter,
};

/// Dashboard rollups with the configured windows.
pub fn stats_report(
    snapshot: &Snapshot,
    config: &InsightsConfig,
    now: DateTime<Utc>,
) -> AggregateStats {
    compute_stats_with(
        &snapshot.clients,
        &snapshot.processes,
        &snapshot.contracts,
        &snapshot.tasks,
        now,
        &config.stats_options(),
    )
}

/// Duplicate candidates, optionally with a one-off threshold in place of the
/// configured one.
pub fn duplicates_report(
    snapshot: &Snapshot,
    config: &InsightsConfig,
    threshold: Option<f64>,
) -> Result<Vec<DuplicateCandidate>, ConfigError> {
    let mut options = config.match_options();
    if let Some(threshold) = threshold {
        validate_threshold(threshold)?;
        options.threshold = threshold;
    }

    let candidates = find_duplicate_candidates_with(&snapshot.clients, &options);
    tracing::info!(
        clients = snapshot.clients.len(),
        candidates = candidates.len(),
        threshold = options.threshold,
        "Duplicate scan finished"
    );
    Ok(candidates)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRow {
    pub id: Uuid,
    pub name: String,
    pub band: EngagementBand,
    pub breakdown: EngagementBreakdown,
}

/// One row per client, in snapshot order.
pub fn engagement_report(snapshot: &Snapshot, now: DateTime<Utc>) -> Vec<EngagementRow> {
    snapshot
        .clients
        .iter()
        .map(|client| {
            let breakdown = engagement_breakdown(client, now);
            EngagementRow {
                id: client.id,
                name: client.name.clone(),
                band: EngagementBand::from_score(breakdown.score),
                breakdown,
            }
        })
        .collect()
}

/// Records selected by a filter pass, typed by module.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FilteredRecords<'a> {
    Clients(Vec<&'a ClientRecord>),
    Processes(Vec<&'a ProcessRecord>),
    Tasks(Vec<&'a TaskRecord>),
}

impl FilteredRecords<'_> {
    pub fn len(&self) -> usize {
        match self {
            Self::Clients(records) => records.len(),
            Self::Processes(records) => records.len(),
            Self::Tasks(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FiltersReport<'a> {
    pub module: DashboardModule,
    pub active: Vec<String>,
    /// Toggle keys that named no filter of the module.
    pub unknown_keys: Vec<String>,
    pub filters: Vec<QuickFilter>,
    pub records: FilteredRecords<'a>,
}

/// Build the module's filters from live stats, switch on `toggles` in order,
/// then run them with `query`.
pub fn filters_report<'a>(
    snapshot: &'a Snapshot,
    config: &InsightsConfig,
    now: DateTime<Utc>,
    module: DashboardModule,
    toggles: &[String],
    query: &str,
) -> FiltersReport<'a> {
    let stats = stats_report(snapshot, config, now);
    let mut filters = build_filters(module, &stats);
    let mut unknown_keys = Vec::new();

    for key in toggles {
        if !filters.iter().any(|filter| &filter.key == key) {
            tracing::warn!(module = module.as_str(), key = %key, "Unknown filter key");
            unknown_keys.push(key.clone());
            continue;
        }
        filters = toggle_filter(&filters, key);
    }

    let records = match module {
        DashboardModule::Clients => {
            FilteredRecords::Clients(apply_filters(&snapshot.clients, &filters, query))
        }
        DashboardModule::Processes => {
            FilteredRecords::Processes(apply_filters(&snapshot.processes, &filters, query))
        }
        DashboardModule::Tasks => {
            FilteredRecords::Tasks(apply_filters(&snapshot.tasks, &filters, query))
        }
    };

    FiltersReport {
        module,
        active: active_filters(&filters)
            .into_iter()
            .map(str::to_string)
            .collect(),
        unknown_keys,
        filters,
        records,
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::practice::{
        ClientStatus, MissingFieldPolicy, ProcessStatus, TaskPriority, TaskStatus,
    };

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 18, 9, 0, 0)
            .single()
            .expect("valid now")
    }

    fn config() -> InsightsConfig {
        InsightsConfig {
            duplicate_threshold: 0.8,
            missing_field_policy: MissingFieldPolicy::Omit,
            fold_case: false,
            due_soon: Duration::hours(24),
            contract_expiry: Duration::days(30),
        }
    }

    fn client(n: u128, name: &str, phone: &str, status: ClientStatus) -> ClientRecord {
        ClientRecord {
            id: Uuid::from_u128(n),
            name: name.to_string(),
            email: None,
            phone: Some(phone.to_string()),
            status,
            last_interaction_at: now() - Duration::days(1),
            linked_process_ids: Default::default(),
            linked_contract_ids: Default::default(),
            potential_value: dec!(0),
        }
    }

    fn snapshot() -> Snapshot {
        Snapshot {
            clients: vec![
                client(1, "Maria Santos", "11 91234-5678", ClientStatus::Vip),
                client(2, "Maria C. Santos", "(11) 91234-5678", ClientStatus::Active),
                client(3, "Joao Pereira", "21 99876-0000", ClientStatus::Active),
            ],
            processes: vec![ProcessRecord {
                id: Uuid::from_u128(0x100),
                number: "0001234-55.2026.8.26.0100".to_string(),
                title: "Santos v. Banco".to_string(),
                client_id: Some(Uuid::from_u128(1)),
                status: ProcessStatus::Active,
                next_deadline_at: Some(now() + Duration::hours(30)),
                practice_area: None,
            }],
            contracts: Vec::new(),
            tasks: vec![TaskRecord {
                id: Uuid::from_u128(0x300),
                title: "Draft appeal".to_string(),
                description: None,
                status: TaskStatus::Todo,
                priority: TaskPriority::Urgent,
                due_at: None,
                assignee: None,
                process_id: None,
            }],
        }
    }

    #[test]
    fn stats_report_uses_configured_window() {
        let snapshot = snapshot();
        let default = stats_report(&snapshot, &config(), now());
        assert_eq!(default.processes.due_within_window, 0);

        let wide = InsightsConfig {
            due_soon: Duration::hours(48),
            ..config()
        };
        assert_eq!(
            stats_report(&snapshot, &wide, now())
                .processes
                .due_within_window,
            1
        );
    }

    #[test]
    fn threshold_override_replaces_configured_value() {
        let snapshot = snapshot();
        assert!(
            duplicates_report(&snapshot, &config(), None)
                .expect("configured threshold")
                .is_empty()
        );

        let flagged =
            duplicates_report(&snapshot, &config(), Some(0.6)).expect("override in range");
        assert_eq!(flagged.len(), 1);
        assert_eq!(
            (flagged[0].id_a, flagged[0].id_b),
            (Uuid::from_u128(1), Uuid::from_u128(2))
        );
    }

    #[test]
    fn out_of_range_threshold_override_is_rejected() {
        let err = duplicates_report(&snapshot(), &config(), Some(1.5))
            .expect_err("threshold above 1 must fail");
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn engagement_rows_follow_snapshot_order() {
        let rows = engagement_report(&snapshot(), now());
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        assert_eq!(
            ids,
            vec![Uuid::from_u128(1), Uuid::from_u128(2), Uuid::from_u128(3)]
        );
        // 1 day ago, nothing linked: recency 90 * 0.30 = 27
        assert_eq!(rows[0].breakdown.score, 27);
        assert_eq!(rows[0].band, EngagementBand::Cold);

        let rendered = serde_json::to_value(&rows[0]).expect("row serializes");
        assert_eq!(rendered["band"], serde_json::json!("cold"));
        assert_eq!(rendered["breakdown"]["score"], serde_json::json!(27));
    }

    #[test]
    fn unknown_toggle_is_reported_and_skipped() {
        let snapshot = snapshot();
        let toggles = vec!["vip".to_string(), "archived".to_string()];
        let report = filters_report(
            &snapshot,
            &config(),
            now(),
            DashboardModule::Clients,
            &toggles,
            "",
        );

        assert_eq!(report.active, vec!["vip".to_string()]);
        assert_eq!(report.unknown_keys, vec!["archived".to_string()]);
        assert_eq!(report.records.len(), 1);
    }

    #[test]
    fn filters_report_serializes_camel_case_with_plain_record_list() {
        let snapshot = snapshot();
        let toggles = vec!["urgent".to_string()];
        let report = filters_report(
            &snapshot,
            &config(),
            now(),
            DashboardModule::Tasks,
            &toggles,
            "appeal",
        );
        let rendered = serde_json::to_value(&report).expect("report serializes");

        assert_eq!(rendered["module"], serde_json::json!("tasks"));
        assert_eq!(rendered["unknownKeys"], serde_json::json!([]));
        assert_eq!(rendered["active"], serde_json::json!(["urgent"]));
        let records = rendered["records"].as_array().expect("records array");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], serde_json::json!("Draft appeal"));
    }
}
