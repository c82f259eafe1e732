pub mod account;
pub mod audit_overlay;
pub mod collaborator;
pub mod incident;
pub mod sample_id;

pub use account::{Login, NewAccount, Profile, Role};
pub use audit_overlay::{AuditOverlay, AuditStatus};
pub use collaborator::Collaborator;
pub use incident::{Incident, IncidentColumn, IncidentTimeline, NON_COMPLIANT_STATUS};
pub use sample_id::SampleId;
