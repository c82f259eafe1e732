/// Outbound ports (Driven ports) - Infrastructure interfaces
///
/// These ports define the interfaces that the application core uses
/// to interact with external systems (hosted backend, file system, console, etc.).
pub mod account_provisioner;
pub mod collaborator_directory;
pub mod evidence_store;
pub mod incident_repository;
pub mod output_presenter;
pub mod profile_repository;
pub mod progress_reporter;
pub mod report_formatter;
pub mod spreadsheet_reader;

pub use account_provisioner::AccountProvisioner;
pub use collaborator_directory::CollaboratorDirectory;
pub use evidence_store::{EvidenceFile, EvidenceStore};
pub use incident_repository::{IncidentQuery, IncidentRepository};
pub use output_presenter::OutputPresenter;
pub use profile_repository::ProfileRepository;
pub use progress_reporter::ProgressReporter;
pub use report_formatter::ReportFormatter;
pub use spreadsheet_reader::SpreadsheetReader;
