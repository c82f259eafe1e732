/// Data Transfer Objects for application layer
///
/// DTOs are used to transfer data between the application layer
/// and adapters, keeping the domain layer isolated.
mod account_request;
mod audit_request;
mod import_request;
mod import_response;
mod output_format;

pub use account_request::AccountRequest;
pub use audit_request::AuditRequest;
pub use import_request::{ImportRequest, DEFAULT_CHUNK_SIZE};
pub use import_response::{ImportResponse, PREVIEW_SIZE};
pub use output_format::OutputFormat;
