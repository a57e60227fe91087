//! Collection snapshot as exported by the CRM store.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{RecordError, SnapshotError};
use crate::practice::records::{
    ClientRecord, ContractRecord, ProcessRecord, TaskRecord, ensure_unique_ids,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub clients: Vec<ClientRecord>,
    pub processes: Vec<ProcessRecord>,
    pub contracts: Vec<ContractRecord>,
    pub tasks: Vec<TaskRecord>,
}

impl Snapshot {
    pub fn from_json(raw: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read, parse and validate a snapshot file.
    pub fn load(path: &Path, now: DateTime<Utc>) -> Result<Self, SnapshotError> {
        let raw = std::fs::read_to_string(path).map_err(|source| SnapshotError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let snapshot = Self::from_json(&raw)?;
        snapshot.validate(now)?;
        tracing::debug!(
            path = %path.display(),
            clients = snapshot.clients.len(),
            processes = snapshot.processes.len(),
            contracts = snapshot.contracts.len(),
            tasks = snapshot.tasks.len(),
            "Loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Reject inputs outside the scoring domain: negative money values and
    /// ids repeated within a collection. Interactions dated after `now` are
    /// accepted (recency saturates) but logged.
    pub fn validate(&self, now: DateTime<Utc>) -> Result<(), RecordError> {
        ensure_unique_ids("client", self.clients.iter().map(|c| c.id))?;
        ensure_unique_ids("process", self.processes.iter().map(|p| p.id))?;
        ensure_unique_ids("contract", self.contracts.iter().map(|c| c.id))?;
        ensure_unique_ids("task", self.tasks.iter().map(|t| t.id))?;

        for client in &self.clients {
            client.validate()?;
            if client.last_interaction_at > now {
                tracing::warn!(
                    client_id = %client.id,
                    last_interaction_at = %client.last_interaction_at,
                    "Client interaction is dated after the analysis time"
                );
            }
        }
        for contract in &self.contracts {
            contract.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::TimeZone;

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0)
            .single()
            .expect("valid now")
    }

    const SAMPLE: &str = r#"{
        "clients": [
            {
                "id": "00000000-0000-0000-0000-000000000001",
                "name": "Maria Santos",
                "phone": "+55 11 91234-5678",
                "status": "vip",
                "lastInteractionAt": "2026-05-30T10:00:00Z",
                "linkedProcessIds": ["00000000-0000-0000-0000-0000000000a1"],
                "potentialValue": 50000
            }
        ],
        "contracts": [
            {
                "id": "00000000-0000-0000-0000-0000000000c1",
                "clientId": "00000000-0000-0000-0000-000000000001",
                "title": "Monthly retainer",
                "status": "active",
                "monthlyValue": "3500.00"
            }
        ]
    }"#;

    #[test]
    fn missing_collections_default_to_empty() {
        let snapshot = Snapshot::from_json(SAMPLE).expect("valid snapshot");
        assert_eq!(snapshot.clients.len(), 1);
        assert_eq!(snapshot.contracts.len(), 1);
        assert!(snapshot.processes.is_empty());
        assert!(snapshot.tasks.is_empty());
        assert!(snapshot.validate(now()).is_ok());
    }

    #[test]
    fn duplicate_client_ids_fail_validation() {
        let mut snapshot = Snapshot::from_json(SAMPLE).expect("valid snapshot");
        let copy = snapshot.clients[0].clone();
        snapshot.clients.push(copy);
        let err = snapshot.validate(now()).expect_err("duplicate id");
        assert!(matches!(
            err,
            RecordError::DuplicateId {
                collection: "client",
                ..
            }
        ));
    }

    #[test]
    fn negative_contract_value_fails_validation() {
        let mut snapshot = Snapshot::from_json(SAMPLE).expect("valid snapshot");
        snapshot.contracts[0].monthly_value = rust_decimal::Decimal::NEGATIVE_ONE;
        let err = snapshot.validate(now()).expect_err("negative value");
        assert!(matches!(err, RecordError::NegativeMonthlyValue { .. }));
    }

    #[test]
    fn future_interaction_is_accepted() {
        let mut snapshot = Snapshot::from_json(SAMPLE).expect("valid snapshot");
        snapshot.clients[0].last_interaction_at = now() + chrono::Duration::days(3);
        assert!(snapshot.validate(now()).is_ok());
    }

    #[test]
    fn load_reads_and_validates_file() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(SAMPLE.as_bytes()).expect("write snapshot");

        let snapshot = Snapshot::load(file.path(), now()).expect("load snapshot");
        assert_eq!(snapshot.clients[0].name, "Maria Santos");
    }

    #[test]
    fn load_reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(b"{ not json").expect("write snapshot");

        let err = Snapshot::load(file.path(), now()).expect_err("malformed");
        assert!(matches!(err, SnapshotError::Json(_)));
    }
}
