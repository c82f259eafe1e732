//! Session-owned audit worklist
//!
//! The worklist is the in-memory list an auditor works through. Saves are
//! applied to it optimistically; when the store rejects a save the whole list
//! is reloaded so it reflects what was actually persisted.

use crate::audit::domain::{AuditOverlay, AuditStatus, Incident};
use crate::ports::outbound::{IncidentQuery, IncidentRepository};
use crate::shared::Result;
use serde::Serialize;

/// Default number of incidents loaded into the worklist
pub const DEFAULT_WORKLIST_LIMIT: usize = 100;

/// Audit status filter of the worklist
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorklistFilter {
    #[default]
    All,
    Pending,
    Treated,
}

impl WorklistFilter {
    pub fn accepts(&self, status: AuditStatus) -> bool {
        match self {
            WorklistFilter::All => true,
            WorklistFilter::Pending => status == AuditStatus::Pending,
            WorklistFilter::Treated => status == AuditStatus::Treated,
        }
    }
}

impl std::str::FromStr for WorklistFilter {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(WorklistFilter::All),
            "pending" => Ok(WorklistFilter::Pending),
            "treated" => Ok(WorklistFilter::Treated),
            _ => Err(format!(
                "Invalid status filter: {}. Please specify 'all', 'pending' or 'treated'",
                s
            )),
        }
    }
}

impl std::fmt::Display for WorklistFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WorklistFilter::All => write!(f, "all"),
            WorklistFilter::Pending => write!(f, "pending"),
            WorklistFilter::Treated => write!(f, "treated"),
        }
    }
}

/// AuditWorklist - The most recent non-compliant incidents
#[derive(Debug, Clone, Default)]
pub struct AuditWorklist {
    incidents: Vec<Incident>,
    limit: usize,
}

impl AuditWorklist {
    /// Loads the worklist from the store
    pub async fn load<R>(repository: &R, limit: usize) -> Result<Self>
    where
        R: IncidentRepository + ?Sized,
    {
        let incidents = repository
            .find_incidents(&IncidentQuery::worklist(limit))
            .await?;
        tracing::debug!(loaded = incidents.len(), limit, "worklist loaded");
        Ok(Self { incidents, limit })
    }

    pub fn from_incidents(incidents: Vec<Incident>) -> Self {
        let limit = incidents.len().max(DEFAULT_WORKLIST_LIMIT);
        Self { incidents, limit }
    }

    /// Replaces the local list with the store's current content
    pub async fn reload<R>(&mut self, repository: &R) -> Result<()>
    where
        R: IncidentRepository + ?Sized,
    {
        *self = Self::load(repository, self.limit).await?;
        Ok(())
    }

    pub fn incidents(&self) -> &[Incident] {
        &self.incidents
    }

    pub fn len(&self) -> usize {
        self.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incidents.is_empty()
    }

    pub fn find(&self, incident_id: &str) -> Option<&Incident> {
        self.incidents
            .iter()
            .find(|i| i.id.as_deref() == Some(incident_id))
    }

    /// Incidents passing the status filter and the search text
    ///
    /// The search is a case-insensitive substring match on the sample id or
    /// the indicator; blank search text matches everything.
    pub fn filtered(&self, filter: WorklistFilter, search: Option<&str>) -> Vec<Incident> {
        let needle = search
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty());

        self.incidents
            .iter()
            .filter(|incident| filter.accepts(incident.audit.status))
            .filter(|incident| match &needle {
                None => true,
                Some(needle) => {
                    let sample_hit = incident
                        .sample_id
                        .as_ref()
                        .is_some_and(|id| id.as_str().to_lowercase().contains(needle));
                    let indicator_hit = incident
                        .indicator
                        .as_deref()
                        .is_some_and(|ind| ind.to_lowercase().contains(needle));
                    sample_hit || indicator_hit
                }
            })
            .cloned()
            .collect()
    }

    /// Applies a saved overlay locally before the store confirms it
    ///
    /// Returns false when the incident is not part of the worklist.
    pub fn apply_optimistic(&mut self, incident_id: &str, overlay: &AuditOverlay) -> bool {
        match self
            .incidents
            .iter_mut()
            .find(|i| i.id.as_deref() == Some(incident_id))
        {
            Some(incident) => {
                incident.audit = overlay.clone();
                true
            }
            None => false,
        }
    }
}
