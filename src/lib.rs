//! audit-portal - quality-audit portal for service incidents
//!
//! Imports incident spreadsheets into a hosted store (upsert by `ID_MOSTRA`),
//! lets auditors record whether each non-compliant incident was corrected and
//! why, and builds dashboards and offender reports from the audited data.
//!
//! # Architecture
//!
//! The library is organized into the following layers:
//!
//! - **Domain Layer** (`audit`): Incidents, the audit overlay, policies and aggregations
//! - **Application Layer** (`application`): Use cases, DTOs, read models and the worklist
//! - **Ports** (`ports`): Interface definitions for infrastructure
//! - **Adapters** (`adapters`): REST backend, local store, spreadsheets, console, formatters
//! - **Shared** (`shared`): Common utilities and error types
//!
//! # Example
//!
//! ```no_run
//! use audit_portal::prelude::*;
//! use std::path::PathBuf;
//!
//! # async fn example() -> Result<()> {
//! let repository = InMemoryIncidentRepository::new();
//! let use_case = ImportIncidentsUseCase::new(
//!     SpreadsheetFileReader::new(),
//!     repository.clone(),
//!     StderrProgressReporter::new(),
//! );
//!
//! let response = use_case
//!     .execute(ImportRequest::new(PathBuf::from("incidents.xlsx")))
//!     .await?;
//! println!("{} incident(s) imported", response.upserted);
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod application;
pub mod audit;
pub mod cli;
pub mod config;
pub mod ports;
pub mod shared;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::adapters::outbound::console::StderrProgressReporter;
    pub use crate::adapters::outbound::filesystem::{
        FileSystemWriter, LocalStore, SpreadsheetFileReader, StdoutPresenter,
        TomlCollaboratorDirectory,
    };
    pub use crate::adapters::outbound::formatters::{JsonFormatter, MarkdownFormatter};
    pub use crate::adapters::outbound::memory::{
        InMemoryAccountDirectory, InMemoryEvidenceStore, InMemoryIncidentRepository,
    };
    pub use crate::application::dto::{
        AccountRequest, AuditRequest, ImportRequest, ImportResponse, OutputFormat,
    };
    pub use crate::application::read_models::{DashboardReadModel, OffenderReport, WorklistView};
    pub use crate::application::use_cases::{
        AuditIncidentUseCase, BuildDashboardUseCase, BuildOffenderReportUseCase,
        ImportIncidentsUseCase, ListIncidentsUseCase, MarkFeedbackSentUseCase,
        ProvisionAccountUseCase,
    };
    pub use crate::application::worklist::{AuditWorklist, WorklistFilter};
    pub use crate::audit::domain::{
        AuditOverlay, AuditStatus, Collaborator, Incident, Login, NewAccount, Profile, Role,
        SampleId,
    };
    pub use crate::ports::outbound::{
        AccountProvisioner, CollaboratorDirectory, EvidenceFile, EvidenceStore, IncidentQuery,
        IncidentRepository, OutputPresenter, ProfileRepository, ProgressReporter,
        ReportFormatter, SpreadsheetReader,
    };
    pub use crate::shared::error::AuditError;
    pub use crate::shared::Result;
}
