use std::path::PathBuf;

/// Number of incidents sent to the store per upsert call
pub const DEFAULT_CHUNK_SIZE: usize = 100;

/// ImportRequest - Request DTO for the spreadsheet import use case
#[derive(Debug, Clone)]
pub struct ImportRequest {
    /// Path to the `.csv` / `.xlsx` / `.xls` / `.ods` file
    pub spreadsheet_path: PathBuf,
    /// Incidents per upsert call
    pub chunk_size: usize,
    /// Parse, validate and preview without writing anything
    pub dry_run: bool,
}

impl ImportRequest {
    pub fn new(spreadsheet_path: PathBuf) -> Self {
        Self {
            spreadsheet_path,
            chunk_size: DEFAULT_CHUNK_SIZE,
            dry_run: false,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
