use crate::ports::outbound::{EvidenceFile, EvidenceStore};
use crate::shared::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// InMemoryEvidenceStore adapter keeping uploaded objects in memory
#[derive(Debug, Clone)]
pub struct InMemoryEvidenceStore {
    base_url: String,
    objects: Arc<DashMap<String, EvidenceFile>>,
}

impl InMemoryEvidenceStore {
    /// # Arguments
    /// * `base_url` - Prefix of the returned public URLs
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: Arc::new(DashMap::new()),
        }
    }

    pub fn object(&self, object_path: &str) -> Option<EvidenceFile> {
        self.objects.get(object_path).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[async_trait]
impl EvidenceStore for InMemoryEvidenceStore {
    async fn upload(&self, object_path: &str, file: &EvidenceFile) -> Result<String> {
        self.objects.insert(object_path.to_string(), file.clone());
        Ok(format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            object_path
        ))
    }
}
