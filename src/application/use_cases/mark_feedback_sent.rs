use crate::audit::domain::Login;
use crate::ports::outbound::{IncidentQuery, IncidentRepository, ProgressReporter};
use crate::shared::Result;

/// MarkFeedbackSentUseCase - Flags the treated incidents of one offender
pub struct MarkFeedbackSentUseCase<IR, PR> {
    incident_repository: IR,
    progress_reporter: PR,
}

impl<IR, PR> MarkFeedbackSentUseCase<IR, PR>
where
    IR: IncidentRepository,
    PR: ProgressReporter,
{
    pub fn new(incident_repository: IR, progress_reporter: PR) -> Self {
        Self {
            incident_repository,
            progress_reporter,
        }
    }

    /// Sets the feedback-sent flag on every treated incident of the offender
    ///
    /// # Returns
    /// Number of incidents updated
    ///
    /// # Errors
    /// Returns an error if the login is invalid or an update fails; incidents
    /// updated before the failure keep the new flag
    pub async fn execute(&self, offender_login: &str, sent: bool) -> Result<usize> {
        let login = Login::new(offender_login)?;
        let incidents = self
            .incident_repository
            .find_incidents(&IncidentQuery::treated().with_offender(login.as_str()))
            .await?;

        let mut updated = 0;
        for incident in incidents.iter().filter(|i| i.audit.feedback_sent != sent) {
            let Some(id) = incident.id.as_deref() else {
                continue;
            };
            self.incident_repository.set_feedback_sent(id, sent).await?;
            updated += 1;
        }

        self.progress_reporter.report_completion(&format!(
            "✅ Feedback {} for {} incident(s) of {}",
            if sent { "marked as sent" } else { "cleared" },
            updated,
            login
        ));
        Ok(updated)
    }
}
