use crate::application::dto::AuditRequest;
use crate::application::worklist::AuditWorklist;
use crate::audit::domain::AuditOverlay;
use crate::audit::policies::AuditCompleteness;
use crate::ports::outbound::{EvidenceFile, EvidenceStore, IncidentRepository, ProfileRepository, ProgressReporter};
use crate::shared::Result;
use anyhow::Context;
use chrono::Utc;
use uuid::Uuid;

/// AuditIncidentUseCase - Saves the auditor's verdict on one incident
///
/// # Type Parameters
/// * `IR` - IncidentRepository implementation
/// * `ES` - EvidenceStore implementation
/// * `PRF` - ProfileRepository implementation (auditor identity)
/// * `PR` - ProgressReporter implementation
pub struct AuditIncidentUseCase<IR, ES, PRF, PR> {
    incident_repository: IR,
    evidence_store: ES,
    profile_repository: PRF,
    progress_reporter: PR,
}

impl<IR, ES, PRF, PR> AuditIncidentUseCase<IR, ES, PRF, PR>
where
    IR: IncidentRepository,
    ES: EvidenceStore,
    PRF: ProfileRepository,
    PR: ProgressReporter,
{
    pub fn new(
        incident_repository: IR,
        evidence_store: ES,
        profile_repository: PRF,
        progress_reporter: PR,
    ) -> Self {
        Self {
            incident_repository,
            evidence_store,
            profile_repository,
            progress_reporter,
        }
    }

    /// Validates, uploads the evidence and persists the overlay
    ///
    /// # Returns
    /// The overlay as stored
    ///
    /// # Errors
    /// - `AuditError::IncompleteAudit` when the corrected flag or the reason is missing;
    ///   nothing is uploaded or written in that case
    /// - `AuditError::IncidentNotFound` when the id is unknown to the store
    /// - any upload or backend failure
    pub async fn execute(&self, request: AuditRequest) -> Result<AuditOverlay> {
        let overlay = self.prepare_overlay(&request).await?;

        self.incident_repository
            .record_audit(&request.incident_id, &overlay)
            .await?;

        self.report_saved(&request.incident_id, &overlay);
        Ok(overlay)
    }

    /// Same as [`execute`](Self::execute), keeping a loaded worklist in sync
    ///
    /// The overlay is applied to the worklist before the store is written.
    /// If the write fails the worklist is reloaded from the store, so it shows
    /// the state that was actually persisted, and the write error is returned.
    pub async fn execute_in(&self, worklist: &mut AuditWorklist, request: AuditRequest) -> Result<AuditOverlay> {
        let overlay = self.prepare_overlay(&request).await?;
        worklist.apply_optimistic(&request.incident_id, &overlay);

        if let Err(e) = self
            .incident_repository
            .record_audit(&request.incident_id, &overlay)
            .await
        {
            tracing::warn!(incident = %request.incident_id, error = %e, "audit save failed, reloading worklist");
            if let Err(reload_error) = worklist.reload(&self.incident_repository).await {
                tracing::warn!(error = %reload_error, "worklist reload failed");
            }
            return Err(e);
        }

        self.report_saved(&request.incident_id, &overlay);
        Ok(overlay)
    }

    async fn prepare_overlay(&self, request: &AuditRequest) -> Result<AuditOverlay> {
        let (corrected, reason) = AuditCompleteness::validate(request.corrected, &request.reason)?;

        let evidence_url = match &request.evidence {
            Some(file) => Some(self.upload_evidence(&request.incident_id, file).await?),
            None => None,
        };

        let auditor_login = self
            .profile_repository
            .current_profile()
            .await?
            .map(|profile| profile.login);

        let offender_login = request
            .offender_login
            .as_deref()
            .map(|login| login.trim().to_uppercase())
            .filter(|login| !login.is_empty());

        // reasons are grouped by exact text in the reports
        Ok(AuditOverlay::treated(
            corrected,
            reason.to_uppercase(),
            offender_login,
            evidence_url,
            auditor_login,
            Utc::now(),
        ))
    }

    async fn upload_evidence(&self, incident_id: &str, file: &EvidenceFile) -> Result<String> {
        let object_path = evidence_object_path(incident_id, file);
        self.progress_reporter
            .report(&format!("📎 Uploading evidence: {}", file.file_name));

        let url = self
            .evidence_store
            .upload(&object_path, file)
            .await
            .with_context(|| format!("Failed to upload evidence for incident {}", incident_id))?;

        tracing::debug!(%object_path, %url, "evidence uploaded");
        Ok(url)
    }

    fn report_saved(&self, incident_id: &str, overlay: &AuditOverlay) {
        let verdict = match overlay.corrected {
            Some(true) => "corrected",
            _ => "not corrected",
        };
        self.progress_reporter.report_completion(&format!(
            "✅ Incident {} marked treated ({})",
            incident_id, verdict
        ));
    }
}

/// `<incident id>/<random uuid>.<ext>`
fn evidence_object_path(incident_id: &str, file: &EvidenceFile) -> String {
    let name = Uuid::new_v4();
    match file.extension() {
        Some(ext) => format!("{}/{}.{}", incident_id, name, ext),
        None => format!("{}/{}", incident_id, name),
    }
}
