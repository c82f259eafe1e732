use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application.
///
/// These codes let scripts tell a clean run apart from an import that
/// finished with status warnings or from a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Success
    Success = 0,
    /// Import finished but some rows will not show up in the audit worklist (`--strict`)
    WarningsDetected = 1,
    /// Invalid command-line arguments (clap parsing errors)
    InvalidArguments = 2,
    /// Application error (backend error, parse error, file I/O error, etc.)
    ApplicationError = 3,
}

impl ExitCode {
    /// Convert to i32 for use with std::process::exit
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitCode::Success => write!(f, "Success (0)"),
            ExitCode::WarningsDetected => write!(f, "Warnings Detected (1)"),
            ExitCode::InvalidArguments => write!(f, "Invalid Arguments (2)"),
            ExitCode::ApplicationError => write!(f, "Application Error (3)"),
        }
    }
}

/// Application-specific errors for the audit portal.
///
/// Every variant carries a hint so the message shown to the user says what
/// to try next. Prior state is never touched when one of these is raised.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("Spreadsheet not found: {path}\n\n💡 Hint: {suggestion}")]
    SpreadsheetNotFound { path: PathBuf, suggestion: String },

    #[error("Failed to parse spreadsheet: {path}\nDetails: {details}\n\n💡 Hint: The first row must hold the column headers (ID_MOSTRA, INDICADOR, ...)")]
    SpreadsheetParseError { path: PathBuf, details: String },

    #[error("No valid records found for import ({parsed} row(s) read)\n\n💡 Hint: Check that the ID_MOSTRA column exists and is filled in")]
    NoImportableRecords { parsed: usize },

    #[error("Audit is incomplete: missing {missing}\n\n💡 Hint: Pass --corrected true|false and a non-empty --reason")]
    IncompleteAudit { missing: String },

    #[error("Incident not found: {id}\n\n💡 Hint: Run `audit-portal list` to see incident ids")]
    IncidentNotFound { id: String },

    #[error("Not signed in\n\n💡 Hint: Set access_token in the config file or the AUDIT_PORTAL_ACCESS_TOKEN environment variable")]
    NotAuthenticated,

    #[error("Permission denied: {action} requires the admin role (current role: {role})")]
    NotAuthorized { action: String, role: String },

    #[error("Backend request failed: {operation}\nStatus: {status}\nDetails: {details}\n\n💡 Hint: Please verify the backend URL, API key and network connectivity")]
    BackendError {
        operation: String,
        status: u16,
        details: String,
    },

    #[error("Account provisioning was rejected: {message}")]
    ProvisioningRejected { message: String },

    #[error("Failed to write to file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the directory exists and you have write permissions")]
    FileWriteError { path: PathBuf, details: String },

    #[error("Failed to read file: {path}\nDetails: {details}\n\n💡 Hint: Please verify that the file exists and you have read permissions")]
    FileReadError { path: PathBuf, details: String },

    /// Validation error for value objects and requests
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Security violation: {path}\nReason: {reason}\n\n💡 Hint: {hint}")]
    SecurityError {
        path: PathBuf,
        reason: String,
        hint: String,
    },
}
