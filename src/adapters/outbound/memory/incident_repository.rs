use crate::audit::domain::{AuditOverlay, AuditStatus, Incident, SampleId};
use crate::ports::outbound::{IncidentQuery, IncidentRepository};
use crate::shared::error::AuditError;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct StoredIncident {
    /// Insertion order; breaks creation-time ties
    sequence: u64,
    incident: Incident,
}

#[derive(Debug, Default)]
struct Tables {
    /// storage id -> incident
    incidents: DashMap<String, StoredIncident>,
    /// sample id -> storage id
    by_sample_id: DashMap<SampleId, String>,
    sequence: AtomicU64,
}

/// InMemoryIncidentRepository adapter backed by concurrent maps
///
/// Implements the IncidentRepository port with the same upsert-by-key
/// semantics as the hosted store. Clones share the same tables, so one
/// instance can be handed to several use cases.
#[derive(Debug, Clone, Default)]
pub struct InMemoryIncidentRepository {
    tables: Arc<Tables>,
}

impl InMemoryIncidentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restores a repository from previously stored incidents
    ///
    /// Incidents keep their storage ids; missing ids are assigned.
    pub fn from_incidents(incidents: Vec<Incident>) -> Self {
        let repository = Self::new();
        for mut incident in incidents {
            let id = incident
                .id
                .get_or_insert_with(|| Uuid::new_v4().to_string())
                .clone();
            if let Some(sample_id) = &incident.sample_id {
                repository
                    .tables
                    .by_sample_id
                    .insert(sample_id.clone(), id.clone());
            }
            repository.insert(id, incident);
        }
        repository
    }

    /// Every stored incident in insertion order
    pub fn snapshot(&self) -> Vec<Incident> {
        let mut stored: Vec<StoredIncident> = self
            .tables
            .incidents
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        stored.sort_by_key(|s| s.sequence);
        stored.into_iter().map(|s| s.incident).collect()
    }

    pub fn len(&self) -> usize {
        self.tables.incidents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.incidents.is_empty()
    }

    fn insert(&self, id: String, incident: Incident) {
        let sequence = self.tables.sequence.fetch_add(1, Ordering::SeqCst);
        self.tables
            .incidents
            .insert(id, StoredIncident { sequence, incident });
    }

    fn upsert_one(&self, incident: &Incident) -> Result<()> {
        let sample_id = incident.sample_id.clone().ok_or_else(|| AuditError::Validation {
            message: "Cannot upsert an incident without ID_MOSTRA".to_string(),
        })?;

        let existing_id = self
            .tables
            .by_sample_id
            .get(&sample_id)
            .map(|entry| entry.value().clone());

        match existing_id {
            Some(id) => {
                if let Some(mut stored) = self.tables.incidents.get_mut(&id) {
                    stored.incident.merge_imported(incident.clone());
                }
            }
            None => {
                let id = Uuid::new_v4().to_string();
                let mut created = incident.clone();
                created.id = Some(id.clone());
                created.created_at = Some(Utc::now());
                created.audit = AuditOverlay::default();
                self.tables.by_sample_id.insert(sample_id, id.clone());
                self.insert(id, created);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl IncidentRepository for InMemoryIncidentRepository {
    async fn upsert_batch(&self, batch: &[Incident]) -> Result<usize> {
        for incident in batch {
            self.upsert_one(incident)?;
        }
        Ok(batch.len())
    }

    async fn find_incidents(&self, query: &IncidentQuery) -> Result<Vec<Incident>> {
        let mut stored: Vec<StoredIncident> = self
            .tables
            .incidents
            .iter()
            .filter(|entry| query.matches(&entry.value().incident))
            .map(|entry| entry.value().clone())
            .collect();

        if query.newest_first {
            stored.sort_by(|a, b| {
                b.incident
                    .created_at
                    .cmp(&a.incident.created_at)
                    .then_with(|| b.sequence.cmp(&a.sequence))
            });
        } else {
            stored.sort_by_key(|s| s.sequence);
        }
        if let Some(limit) = query.limit {
            stored.truncate(limit);
        }

        Ok(stored.into_iter().map(|s| s.incident).collect())
    }

    async fn count_incidents(&self, status: Option<AuditStatus>) -> Result<u64> {
        let count = self
            .tables
            .incidents
            .iter()
            .filter(|entry| status.is_none_or(|s| entry.value().incident.audit.status == s))
            .count();
        Ok(count as u64)
    }

    async fn record_audit(&self, incident_id: &str, overlay: &AuditOverlay) -> Result<()> {
        let mut stored = self
            .tables
            .incidents
            .get_mut(incident_id)
            .ok_or_else(|| AuditError::IncidentNotFound {
                id: incident_id.to_string(),
            })?;
        stored.incident.audit = overlay.clone();
        Ok(())
    }

    async fn set_feedback_sent(&self, incident_id: &str, sent: bool) -> Result<()> {
        let mut stored = self
            .tables
            .incidents
            .get_mut(incident_id)
            .ok_or_else(|| AuditError::IncidentNotFound {
                id: incident_id.to_string(),
            })?;
        stored.incident.audit.feedback_sent = sent;
        Ok(())
    }
}
