use crate::ports::outbound::EvidenceFile;

/// AuditRequest - Reviewer input for one incident
#[derive(Debug, Clone)]
pub struct AuditRequest {
    /// Storage id of the incident
    pub incident_id: String,
    pub corrected: Option<bool>,
    pub reason: String,
    pub offender_login: Option<String>,
    pub evidence: Option<EvidenceFile>,
}

impl AuditRequest {
    pub fn new(incident_id: impl Into<String>, corrected: Option<bool>, reason: impl Into<String>) -> Self {
        Self {
            incident_id: incident_id.into(),
            corrected,
            reason: reason.into(),
            offender_login: None,
            evidence: None,
        }
    }

    pub fn with_offender(mut self, login: impl Into<String>) -> Self {
        self.offender_login = Some(login.into());
        self
    }

    pub fn with_evidence(mut self, evidence: EvidenceFile) -> Self {
        self.evidence = Some(evidence);
        self
    }
}
