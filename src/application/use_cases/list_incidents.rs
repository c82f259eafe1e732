use crate::application::read_models::WorklistView;
use crate::application::worklist::{AuditWorklist, WorklistFilter};
use crate::ports::outbound::IncidentRepository;
use crate::shared::Result;

/// ListIncidentsUseCase - Loads the audit worklist and filters it
pub struct ListIncidentsUseCase<IR> {
    incident_repository: IR,
    limit: usize,
}

impl<IR> ListIncidentsUseCase<IR>
where
    IR: IncidentRepository,
{
    pub fn new(incident_repository: IR, limit: usize) -> Self {
        Self {
            incident_repository,
            limit,
        }
    }

    /// Loads the most recent non-compliant incidents and applies the filters
    pub async fn execute(&self, filter: WorklistFilter, search: Option<String>) -> Result<WorklistView> {
        let worklist = AuditWorklist::load(&self.incident_repository, self.limit).await?;

        Ok(WorklistView {
            incidents: worklist.filtered(filter, search.as_deref()),
            loaded: worklist.len(),
            filter,
            search,
        })
    }
}
