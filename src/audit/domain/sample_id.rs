use crate::shared::error::AuditError;
use serde::{Deserialize, Serialize};

/// Maximum length for a sample id (storage column limit)
const MAX_SAMPLE_ID_LENGTH: usize = 255;

/// NewType wrapper for the sample id (`ID_MOSTRA`), the uniqueness key of an incident
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SampleId(String);

impl SampleId {
    pub fn new(raw: impl Into<String>) -> Result<Self, AuditError> {
        let raw = raw.into();
        let trimmed = raw.trim();

        if trimmed.is_empty() {
            return Err(AuditError::Validation {
                message: "Sample id cannot be empty".to_string(),
            });
        }

        if trimmed.len() > MAX_SAMPLE_ID_LENGTH {
            return Err(AuditError::Validation {
                message: format!(
                    "Sample id is too long ({} bytes). Maximum allowed: {} bytes",
                    trimmed.len(),
                    MAX_SAMPLE_ID_LENGTH
                ),
            });
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SampleId {
    type Error = AuditError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SampleId> for String {
    fn from(id: SampleId) -> Self {
        id.0
    }
}

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
