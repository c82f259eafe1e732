//! Filtered worklist read model

use crate::application::worklist::WorklistFilter;
use crate::audit::domain::Incident;
use serde::Serialize;

/// What the auditor sees after filtering the loaded worklist
#[derive(Debug, Clone, Serialize)]
pub struct WorklistView {
    pub filter: WorklistFilter,
    pub search: Option<String>,
    /// Incidents loaded from the store before filtering
    pub loaded: usize,
    pub incidents: Vec<Incident>,
}
