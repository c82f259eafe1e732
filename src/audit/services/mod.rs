mod dashboard_aggregator;
mod deduplicator;
mod offender_ranking;
mod sheet_mapper;

pub use dashboard_aggregator::{CountBucket, DailyCount, DashboardAggregator, ParetoEntry, TOP_N};
pub use deduplicator::{DeduplicationOutcome, IncidentDeduplicator};
pub use offender_ranking::{
    FeedbackKpis, OffenderRanking, OffenderTally, NO_REASON_LABEL, RANKING_SIZE,
    UNKNOWN_COLLABORATOR,
};
pub use sheet_mapper::{SheetMapper, SheetMapping};
