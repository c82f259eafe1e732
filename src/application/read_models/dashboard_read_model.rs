//! Dashboard read model
//!
//! KPI counters plus every chart dataset, ready for a formatter.

use crate::audit::domain::Incident;
use crate::audit::services::{CountBucket, DailyCount, DashboardAggregator, ParetoEntry};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Incident counters shown above the charts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DashboardKpis {
    pub total: u64,
    pub pending: u64,
    pub treated: u64,
}

/// Main read model for the dashboard
#[derive(Debug, Clone, Serialize)]
pub struct DashboardReadModel {
    pub generated_at: DateTime<Utc>,
    pub kpis: DashboardKpis,
    pub corrections_per_day: Vec<DailyCount>,
    pub top_offenders: Vec<CountBucket>,
    pub monthly_volume: Vec<CountBucket>,
    pub status_distribution: Vec<CountBucket>,
    pub top_groups: Vec<CountBucket>,
    pub top_symptoms: Vec<CountBucket>,
    pub tools_distribution: Vec<CountBucket>,
    pub solution_pareto: Vec<ParetoEntry>,
}

impl DashboardReadModel {
    /// Runs every aggregation over the incident list
    pub fn build(
        kpis: DashboardKpis,
        incidents: &[Incident],
        aggregator: &DashboardAggregator,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            kpis,
            corrections_per_day: aggregator.corrections_per_day(incidents),
            top_offenders: aggregator.top_offenders(incidents),
            monthly_volume: aggregator.monthly_volume(incidents),
            status_distribution: aggregator.status_distribution(incidents),
            top_groups: aggregator.top_groups(incidents),
            top_symptoms: aggregator.top_symptoms(incidents),
            tools_distribution: aggregator.tools_distribution(incidents),
            solution_pareto: aggregator.solution_pareto(incidents),
        }
    }

    /// True when there is nothing to chart
    pub fn is_empty(&self) -> bool {
        self.kpis.total == 0 && self.monthly_volume.is_empty() && self.top_groups.is_empty()
    }
}
