use crate::application::read_models::{DashboardKpis, DashboardReadModel};
use crate::audit::domain::AuditStatus;
use crate::audit::services::DashboardAggregator;
use crate::ports::outbound::{IncidentQuery, IncidentRepository};
use crate::shared::Result;
use chrono::FixedOffset;

/// BuildDashboardUseCase - KPI counters and chart datasets
///
/// The three counters and the full incident list are fetched concurrently,
/// then aggregated in memory.
pub struct BuildDashboardUseCase<IR> {
    incident_repository: IR,
    aggregator: DashboardAggregator,
}

impl<IR> BuildDashboardUseCase<IR>
where
    IR: IncidentRepository,
{
    /// # Arguments
    /// * `utc_offset` - Offset used to bucket audit timestamps into days
    pub fn new(incident_repository: IR, utc_offset: FixedOffset) -> Self {
        Self {
            incident_repository,
            aggregator: DashboardAggregator::new(utc_offset),
        }
    }

    pub async fn execute(&self) -> Result<DashboardReadModel> {
        let repository = &self.incident_repository;
        let all = IncidentQuery::all().newest_first();

        let (total, pending, treated, incidents) = futures::try_join!(
            repository.count_incidents(None),
            repository.count_incidents(Some(AuditStatus::Pending)),
            repository.count_incidents(Some(AuditStatus::Treated)),
            repository.find_incidents(&all),
        )?;

        tracing::debug!(total, pending, treated, fetched = incidents.len(), "dashboard data fetched");

        Ok(DashboardReadModel::build(
            DashboardKpis {
                total,
                pending,
                treated,
            },
            &incidents,
            &self.aggregator,
        ))
    }
}
