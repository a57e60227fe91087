use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use clawyer_insights::practice::{DashboardModule, Snapshot};
use clawyer_insights::report::{duplicates_report, engagement_report, filters_report, stats_report};
use clawyer_insights::{InsightsConfig, Settings};

#[derive(Debug, Parser)]
#[command(
    name = "clawyer-insights",
    version,
    about = "Duplicate detection, engagement scores and dashboard rollups over a CRM snapshot"
)]
struct Cli {
    /// Settings file (TOML). Missing file means defaults.
    #[arg(long, env = "INSIGHTS_CONFIG", default_value = "insights.toml")]
    config: PathBuf,

    /// Analysis time (RFC 3339). Defaults to the current time.
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Emit logs as JSON lines.
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Dashboard rollups for every module.
    Stats { snapshot: PathBuf },
    /// Probable duplicate clients.
    Duplicates {
        snapshot: PathBuf,
        /// Override the configured threshold.
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Engagement score breakdown per client.
    Engagement { snapshot: PathBuf },
    /// Quick filters with live counts and the records they select.
    Filters {
        snapshot: PathBuf,
        #[arg(long, value_enum)]
        module: DashboardModule,
        /// Filter key to switch on; repeatable.
        #[arg(long = "toggle")]
        toggles: Vec<String>,
        /// Case-insensitive free-text search.
        #[arg(long, default_value = "")]
        query: String,
    },
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("clawyer_insights=info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render output")?;
    println!("{rendered}");
    Ok(())
}

fn load_snapshot(path: &Path, now: DateTime<Utc>) -> anyhow::Result<Snapshot> {
    Snapshot::load(path, now).with_context(|| format!("failed to load snapshot {:?}", path))
}

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let settings = Settings::load(&cli.config)?;
    let config = InsightsConfig::resolve(&settings).context("invalid insights configuration")?;
    let now = cli.now.unwrap_or_else(Utc::now);
    tracing::debug!(%now, config = ?config, "Resolved insights configuration");

    match cli.command {
        Command::Stats { snapshot } => {
            let snapshot = load_snapshot(&snapshot, now)?;
            print_json(&stats_report(&snapshot, &config, now))
        }
        Command::Duplicates {
            snapshot,
            threshold,
        } => {
            let snapshot = load_snapshot(&snapshot, now)?;
            let candidates = duplicates_report(&snapshot, &config, threshold)
                .context("invalid --threshold")?;
            print_json(&candidates)
        }
        Command::Engagement { snapshot } => {
            let snapshot = load_snapshot(&snapshot, now)?;
            print_json(&engagement_report(&snapshot, now))
        }
        Command::Filters {
            snapshot,
            module,
            toggles,
            query,
        } => {
            let snapshot = load_snapshot(&snapshot, now)?;
            let report = filters_report(&snapshot, &config, now, module, &toggles, &query);
            print_json(&report)
        }
    }
}
