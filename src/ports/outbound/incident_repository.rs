use crate::audit::domain::{AuditOverlay, AuditStatus, Incident, NON_COMPLIANT_STATUS};
use crate::shared::Result;
use async_trait::async_trait;

/// Selection criteria for [`IncidentRepository::find_incidents`]
///
/// All criteria are combined with AND; an empty query selects every incident.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentQuery {
    /// Exact indicator status
    pub indicator_status: Option<String>,
    pub audit_status: Option<AuditStatus>,
    /// Upper-cased offender login
    pub offender_login: Option<String>,
    /// Order by creation time, newest first
    pub newest_first: bool,
    pub limit: Option<usize>,
}

impl IncidentQuery {
    pub fn all() -> Self {
        Self::default()
    }

    /// The most recent non-compliant incidents, as shown in the audit worklist
    pub fn worklist(limit: usize) -> Self {
        Self {
            indicator_status: Some(NON_COMPLIANT_STATUS.to_string()),
            newest_first: true,
            limit: Some(limit),
            ..Self::default()
        }
    }

    pub fn treated() -> Self {
        Self {
            audit_status: Some(AuditStatus::Treated),
            ..Self::default()
        }
    }

    pub fn with_offender(mut self, login: &str) -> Self {
        self.offender_login = Some(login.trim().to_uppercase());
        self
    }

    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Checks an incident against the criteria (ordering and limit excluded)
    pub fn matches(&self, incident: &Incident) -> bool {
        let status_ok = self.indicator_status.as_deref().is_none_or(|status| {
            incident
                .indicator_status
                .as_deref()
                .is_some_and(|s| s.trim().to_uppercase() == status.to_uppercase())
        });
        let audit_ok = self
            .audit_status
            .is_none_or(|status| incident.audit.status == status);
        let offender_ok = self
            .offender_login
            .as_deref()
            .is_none_or(|login| incident.audit.normalized_offender().as_deref() == Some(login));

        status_ok && audit_ok && offender_ok
    }
}

/// IncidentRepository port for incident persistence
///
/// This port abstracts the relational store holding incidents and their
/// audit overlays (hosted REST backend, in-memory map, ...).
///
/// # Async Support
/// All methods are async; implementations must be `Send + Sync` so that
/// independent queries can run concurrently.
#[async_trait]
pub trait IncidentRepository: Send + Sync {
    /// Inserts or updates a batch of incidents keyed by sample id
    ///
    /// Only identification fields are written: the audit overlay of an
    /// existing incident is left untouched.
    ///
    /// # Arguments
    /// * `batch` - Incidents that all carry a sample id, unique within the batch
    ///
    /// # Returns
    /// Number of incidents written
    ///
    /// # Errors
    /// Returns an error if the store rejects the batch
    async fn upsert_batch(&self, batch: &[Incident]) -> Result<usize>;

    /// Fetches incidents matching the query
    async fn find_incidents(&self, query: &IncidentQuery) -> Result<Vec<Incident>>;

    /// Counts incidents, optionally restricted to one audit status
    async fn count_incidents(&self, status: Option<AuditStatus>) -> Result<u64>;

    /// Replaces the audit overlay of one incident
    ///
    /// # Arguments
    /// * `incident_id` - Storage id of the incident
    /// * `overlay` - The complete overlay to store
    ///
    /// # Errors
    /// Returns `AuditError::IncidentNotFound` when no incident has this id
    async fn record_audit(&self, incident_id: &str, overlay: &AuditOverlay) -> Result<()>;

    /// Sets the feedback-sent flag of one incident
    ///
    /// # Errors
    /// Returns `AuditError::IncidentNotFound` when no incident has this id
    async fn set_feedback_sent(&self, incident_id: &str, sent: bool) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worklist_query_matches_non_compliant_only() {
        let query = IncidentQuery::worklist(100);
        let non_compliant = Incident {
            indicator_status: Some("NÃO ADERENTE".to_string()),
            ..Default::default()
        };
        let compliant = Incident {
            indicator_status: Some("ADERENTE".to_string()),
            ..Default::default()
        };

        assert!(query.matches(&non_compliant));
        assert!(!query.matches(&compliant));
        assert!(!query.matches(&Incident::default()));
        assert_eq!(query.limit, Some(100));
        assert!(query.newest_first);
    }

    #[test]
    fn test_offender_query_normalizes_login() {
        let query = IncidentQuery::treated().with_offender(" jsilva ");
        assert_eq!(query.offender_login.as_deref(), Some("JSILVA"));

        let mut incident = Incident::default();
        incident.audit.status = AuditStatus::Treated;
        incident.audit.offender_login = Some("jsilva".to_string());
        assert!(query.matches(&incident));

        incident.audit.status = AuditStatus::Pending;
        assert!(!query.matches(&incident));
    }

    #[test]
    fn test_empty_query_matches_everything() {
        assert!(IncidentQuery::all().matches(&Incident::default()));
    }
}
