use crate::application::read_models::OffenderReport;
use crate::audit::services::OffenderRanking;
use crate::ports::outbound::{CollaboratorDirectory, IncidentQuery, IncidentRepository};
use crate::shared::Result;

/// BuildOffenderReportUseCase - Offender ranking over treated incidents
///
/// # Type Parameters
/// * `IR` - IncidentRepository implementation
/// * `CD` - CollaboratorDirectory implementation
pub struct BuildOffenderReportUseCase<IR, CD> {
    incident_repository: IR,
    collaborator_directory: CD,
}

impl<IR, CD> BuildOffenderReportUseCase<IR, CD>
where
    IR: IncidentRepository,
    CD: CollaboratorDirectory,
{
    pub fn new(incident_repository: IR, collaborator_directory: CD) -> Self {
        Self {
            incident_repository,
            collaborator_directory,
        }
    }

    pub async fn execute(&self) -> Result<OffenderReport> {
        let treated = self
            .incident_repository
            .find_incidents(&IncidentQuery::treated())
            .await?;

        let kpis = OffenderRanking::kpis(&treated);
        let ranking = OffenderRanking::rank(&treated, |login| self.collaborator_directory.lookup(login));
        let top_reasons = OffenderRanking::top_reasons(&treated);

        Ok(OffenderReport::new(kpis, ranking, top_reasons))
    }
}
