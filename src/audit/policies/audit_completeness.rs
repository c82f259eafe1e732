use crate::shared::error::AuditError;

/// AuditCompleteness - Decides whether an audit may be saved as treated
///
/// An incident can only be marked treated once the auditor has said whether
/// it was corrected and has written down why.
pub struct AuditCompleteness;

impl AuditCompleteness {
    /// Validates the two mandatory audit inputs
    ///
    /// # Returns
    /// The corrected flag and the trimmed reason
    ///
    /// # Errors
    /// `AuditError::IncompleteAudit` naming every missing input
    pub fn validate(corrected: Option<bool>, reason: &str) -> Result<(bool, String), AuditError> {
        let reason = reason.trim();

        let mut missing = Vec::new();
        if corrected.is_none() {
            missing.push("corrected flag");
        }
        if reason.is_empty() {
            missing.push("reason");
        }

        match corrected {
            Some(flag) if missing.is_empty() => Ok((flag, reason.to_string())),
            _ => Err(AuditError::IncompleteAudit {
                missing: missing.join(" and "),
            }),
        }
    }
}
