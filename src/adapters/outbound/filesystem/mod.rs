/// Filesystem adapters for file I/O operations
mod cell_format;
mod collaborator_file;
mod evidence_file;
mod file_writer;
mod local_store;
mod spreadsheet_reader;

pub use cell_format::format_excel_serial;
pub use collaborator_file::TomlCollaboratorDirectory;
pub use evidence_file::read_evidence_file;
pub use file_writer::{FileSystemWriter, StdoutPresenter};
pub use local_store::{LocalEvidenceStore, LocalStore, LOCAL_OPERATOR_LOGIN};
pub use spreadsheet_reader::SpreadsheetFileReader;
