/// Mock implementations for testing
mod mock_collaborator_directory;
mod mock_incident_repository;
mod mock_progress_reporter;
mod mock_spreadsheet_reader;

pub use mock_collaborator_directory::MockCollaboratorDirectory;
pub use mock_incident_repository::MockIncidentRepository;
pub use mock_progress_reporter::MockProgressReporter;
pub use mock_spreadsheet_reader::MockSpreadsheetReader;
