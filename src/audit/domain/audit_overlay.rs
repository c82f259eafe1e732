use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Audit state of an incident.
///
/// Stored as the strings `Pendente` / `Tratado`; any other or missing value
/// reads back as pending.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AuditStatus {
    #[default]
    Pending,
    Treated,
}

impl AuditStatus {
    const PENDING_WIRE: &'static str = "Pendente";
    const TREATED_WIRE: &'static str = "Tratado";

    /// Parses the stored value, treating anything unknown as pending
    pub fn from_wire(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(Self::TREATED_WIRE) => AuditStatus::Treated,
            _ => AuditStatus::Pending,
        }
    }

    pub fn as_wire(&self) -> &'static str {
        match self {
            AuditStatus::Pending => Self::PENDING_WIRE,
            AuditStatus::Treated => Self::TREATED_WIRE,
        }
    }

    pub fn is_treated(&self) -> bool {
        matches!(self, AuditStatus::Treated)
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditStatus::Pending => write!(f, "pending"),
            AuditStatus::Treated => write!(f, "treated"),
        }
    }
}

/// Reviewer-entered fields layered onto an incident.
///
/// There is exactly one overlay per incident; a fresh import carries the
/// default (pending, nothing filled in).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditOverlay {
    pub status: AuditStatus,
    pub corrected: Option<bool>,
    pub reason: Option<String>,
    /// Operator login held responsible for the incident
    pub offender_login: Option<String>,
    pub feedback_sent: bool,
    pub evidence_url: Option<String>,
    /// Login of the auditor who saved the overlay
    pub auditor_login: Option<String>,
    pub audited_at: Option<DateTime<Utc>>,
}

impl AuditOverlay {
    /// Overlay for an incident that has just been marked treated
    pub fn treated(
        corrected: bool,
        reason: String,
        offender_login: Option<String>,
        evidence_url: Option<String>,
        auditor_login: Option<String>,
        audited_at: DateTime<Utc>,
    ) -> Self {
        Self {
            status: AuditStatus::Treated,
            corrected: Some(corrected),
            reason: Some(reason),
            offender_login,
            feedback_sent: false,
            evidence_url,
            auditor_login,
            audited_at: Some(audited_at),
        }
    }

    /// Offender login normalized for grouping (trimmed, upper-cased, blank => None)
    pub fn normalized_offender(&self) -> Option<String> {
        self.offender_login
            .as_deref()
            .map(|login| login.trim().to_uppercase())
            .filter(|login| !login.is_empty())
    }
}
