//! Read-side analysis of practice CRM collections: duplicate detection,
//! engagement scoring, dashboard rollups and quick filters.

pub mod dashboard;
pub mod dedupe;
pub mod engagement;
pub mod filters;
pub mod records;
pub mod similarity;
pub mod snapshot;

pub use dashboard::{
    AggregateStats, ClientStats, ContractStats, ProcessStats, StatsOptions, TaskStats,
    compute_stats, compute_stats_with,
};
pub use dedupe::{
    DuplicateCandidate, FieldScores, MatchOptions, MatchWeights, MissingFieldPolicy,
    find_duplicate_candidates, find_duplicate_candidates_with, pair_score,
};
pub use engagement::{
    EngagementBand, EngagementBreakdown, engagement_breakdown, engagement_score, score_clients,
};
pub use filters::{
    DashboardModule, FilterField, Filterable, QuickFilter, active_filters, apply_filters,
    build_filters, toggle_filter,
};
pub use records::{
    ClientRecord, ClientStatus, ContractRecord, ContractStatus, ProcessRecord, ProcessStatus,
    TaskPriority, TaskRecord, TaskStatus,
};
pub use similarity::{edit_distance, normalize_phone, similarity};
pub use snapshot::Snapshot;
