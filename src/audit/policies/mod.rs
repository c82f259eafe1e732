mod audit_completeness;
mod compliance_status;

pub use audit_completeness::AuditCompleteness;
pub use compliance_status::{ComplianceStatusPolicy, StatusSummary};
