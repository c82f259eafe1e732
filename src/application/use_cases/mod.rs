/// Use cases module containing application business logic orchestration
mod audit_incident;
mod build_dashboard;
mod build_offender_report;
mod import_incidents;
mod list_incidents;
mod mark_feedback_sent;
mod provision_account;

pub use audit_incident::AuditIncidentUseCase;
pub use build_dashboard::BuildDashboardUseCase;
pub use build_offender_report::BuildOffenderReportUseCase;
pub use import_incidents::ImportIncidentsUseCase;
pub use list_incidents::ListIncidentsUseCase;
pub use mark_feedback_sent::MarkFeedbackSentUseCase;
pub use provision_account::ProvisionAccountUseCase;
