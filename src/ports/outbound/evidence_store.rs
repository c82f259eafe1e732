use crate::shared::Result;
use async_trait::async_trait;

/// An evidence image ready to be uploaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvidenceFile {
    /// Original file name, used for its extension
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl EvidenceFile {
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Lower-cased extension of the original file name, if any
    pub fn extension(&self) -> Option<String> {
        std::path::Path::new(&self.file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty())
            .map(str::to_lowercase)
    }
}

/// EvidenceStore port for evidence image storage
///
/// This port abstracts the object storage bucket that keeps the photos
/// attached to audits.
#[async_trait]
pub trait EvidenceStore: Send + Sync {
    /// Uploads an object and returns its public URL
    ///
    /// # Arguments
    /// * `object_path` - Path inside the evidence bucket (`<incident id>/<uuid>.<ext>`)
    /// * `file` - The evidence image
    ///
    /// # Errors
    /// Returns an error if the upload is rejected
    async fn upload(&self, object_path: &str, file: &EvidenceFile) -> Result<String>;
}
