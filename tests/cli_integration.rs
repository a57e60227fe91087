//! Runs the `clawyer-insights` binary against a snapshot on disk.
//!
//!   cargo test --test cli_integration

use std::path::Path;
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const NOW: &str = "2026-10-18T09:00:00Z";

fn snapshot_json() -> Value {
    json!({
        "clients": [
            {
                "id": "00000000-0000-0000-0000-000000000001",
                "name": "Maria Santos",
                "phone": "+55 (11) 91234-5678",
                "status": "vip",
                "lastInteractionAt": "2026-10-18T09:00:00Z",
                "linkedProcessIds": [
                    "00000000-0000-0000-0000-000000000100",
                    "00000000-0000-0000-0000-000000000101"
                ],
                "linkedContractIds": ["00000000-0000-0000-0000-000000000200"],
                "potentialValue": "50000"
            },
            {
                "id": "00000000-0000-0000-0000-000000000002",
                "name": "Maria C. Santos",
                "phone": "+55 11 91234-5678",
                "status": "active",
                "lastInteractionAt": "2026-09-28T09:00:00Z"
            }
        ],
        "contracts": [
            {
                "id": "00000000-0000-0000-0000-000000000200",
                "clientId": "00000000-0000-0000-0000-000000000001",
                "title": "Monthly retainer",
                "status": "active",
                "monthlyValue": "4200.00"
            }
        ]
    })
}

fn run(dir: &Path, args: &[&str]) -> Output {
    let snapshot = dir.join("snapshot.json");
    std::fs::write(&snapshot, snapshot_json().to_string()).expect("write snapshot");

    let mut command = Command::new(env!("CARGO_BIN_EXE_clawyer-insights"));
    command
        .current_dir(dir)
        .env("INSIGHTS_CONFIG", dir.join("missing.toml"))
        .env("RUST_LOG", "clawyer_insights=warn")
        .args(["--now", NOW]);
    for key in [
        "INSIGHTS_DUPLICATE_THRESHOLD",
        "INSIGHTS_MISSING_FIELD_POLICY",
        "INSIGHTS_FOLD_CASE",
        "INSIGHTS_DUE_SOON_HOURS",
        "INSIGHTS_CONTRACT_EXPIRY_DAYS",
    ] {
        command.env_remove(key);
    }
    let (subcommand, rest) = args.split_first().expect("subcommand");
    command.arg(subcommand).arg(&snapshot).args(rest);
    command.output().expect("run clawyer-insights")
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

#[test]
fn stats_prints_camel_case_rollup() {
    let dir = tempfile::tempdir().expect("tempdir");
    let stats = stdout_json(&run(dir.path(), &["stats"]));

    assert_eq!(stats["generatedAt"], json!(NOW));
    assert_eq!(stats["clients"]["total"], json!(2));
    assert_eq!(stats["clients"]["byStatus"]["vip"], json!(1));
    assert_eq!(stats["contracts"]["activeMonthlyValue"], json!("4200.00"));
}

#[test]
fn duplicates_threshold_flag_overrides_default() {
    let dir = tempfile::tempdir().expect("tempdir");

    let default = stdout_json(&run(dir.path(), &["duplicates"]));
    assert_eq!(default, json!([]));

    let lowered = stdout_json(&run(dir.path(), &["duplicates", "--threshold", "0.6"]));
    let pairs = lowered.as_array().expect("candidate list");
    assert_eq!(pairs.len(), 1);
    assert_eq!(
        pairs[0]["idA"],
        json!("00000000-0000-0000-0000-000000000001")
    );
    assert_eq!(pairs[0]["fields"]["email"], Value::Null);
}

#[test]
fn duplicates_rejects_threshold_outside_unit_range() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(dir.path(), &["duplicates", "--threshold", "1.5"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("INSIGHTS_DUPLICATE_THRESHOLD"), "stderr: {stderr}");
}

#[test]
fn engagement_prints_band_and_breakdown() {
    let dir = tempfile::tempdir().expect("tempdir");
    let rows = stdout_json(&run(dir.path(), &["engagement"]));

    assert_eq!(rows[0]["breakdown"]["score"], json!(75));
    assert_eq!(rows[0]["band"], json!("hot"));
    assert_eq!(rows[1]["band"], json!("cold"));
}

#[test]
fn filters_report_unknown_toggle_and_warn() {
    let dir = tempfile::tempdir().expect("tempdir");
    let output = run(
        dir.path(),
        &["filters", "--module", "clients", "--toggle", "vip", "--toggle", "archived"],
    );
    let report = stdout_json(&output);

    assert_eq!(report["module"], json!("clients"));
    assert_eq!(report["active"], json!(["vip"]));
    assert_eq!(report["unknownKeys"], json!(["archived"]));
    assert_eq!(report["records"].as_array().map(Vec::len), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unknown filter key"), "stderr: {stderr}");
}
