use async_trait::async_trait;
use audit_portal::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Mock IncidentRepository over the in-memory store whose audit writes can be made to fail
#[derive(Clone, Default)]
pub struct MockIncidentRepository {
    pub inner: InMemoryIncidentRepository,
    fail_audits: Arc<AtomicBool>,
}

impl MockIncidentRepository {
    pub fn new(inner: InMemoryIncidentRepository) -> Self {
        Self {
            inner,
            fail_audits: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn fail_audits(&self, fail: bool) {
        self.fail_audits.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl IncidentRepository for MockIncidentRepository {
    async fn upsert_batch(&self, batch: &[Incident]) -> Result<usize> {
        self.inner.upsert_batch(batch).await
    }

    async fn find_incidents(&self, query: &IncidentQuery) -> Result<Vec<Incident>> {
        self.inner.find_incidents(query).await
    }

    async fn count_incidents(&self, status: Option<AuditStatus>) -> Result<u64> {
        self.inner.count_incidents(status).await
    }

    async fn record_audit(&self, incident_id: &str, overlay: &AuditOverlay) -> Result<()> {
        if self.fail_audits.load(Ordering::SeqCst) {
            anyhow::bail!("backend unavailable");
        }
        self.inner.record_audit(incident_id, overlay).await
    }

    async fn set_feedback_sent(&self, incident_id: &str, sent: bool) -> Result<()> {
        self.inner.set_feedback_sent(incident_id, sent).await
    }
}
