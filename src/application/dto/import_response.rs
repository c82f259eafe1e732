use crate::audit::domain::Incident;
use crate::audit::policies::StatusSummary;
use serde::Serialize;

/// How many parsed records are echoed back for review
pub const PREVIEW_SIZE: usize = 50;

/// ImportResponse - Outcome of a spreadsheet import
#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    /// Rows mapped onto incidents (discarded rows excluded)
    pub parsed: usize,
    /// Rows dropped for lacking both sample id and indicator
    pub discarded_rows: usize,
    /// Known columns missing from the header row
    pub missing_columns: Vec<String>,
    /// Keyed incidents left after deduplication
    pub unique: usize,
    pub duplicates_removed: usize,
    /// Incidents without a sample id, which cannot be upserted
    pub missing_key: usize,
    /// Incidents written to the store (0 on a dry run)
    pub upserted: usize,
    pub dry_run: bool,
    pub status_summary: StatusSummary,
    /// First parsed records, in sheet order
    pub preview: Vec<Incident>,
}

impl ImportResponse {
    pub fn has_warnings(&self) -> bool {
        self.status_summary.has_warnings()
    }
}
