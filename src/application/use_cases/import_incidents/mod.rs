use crate::application::dto::{ImportRequest, ImportResponse, PREVIEW_SIZE};
use crate::audit::domain::Incident;
use crate::audit::policies::{ComplianceStatusPolicy, StatusSummary};
use crate::audit::services::{DeduplicationOutcome, IncidentDeduplicator, SheetMapper, SheetMapping};
use crate::ports::outbound::{IncidentRepository, ProgressReporter, SpreadsheetReader};
use crate::shared::error::AuditError;
use crate::shared::Result;
use anyhow::Context;

/// ImportIncidentsUseCase - Spreadsheet upload into the incident store
///
/// Reads the first sheet, maps it onto incidents, warns about rows that
/// will not reach the worklist, collapses duplicate sample ids and upserts
/// the result in fixed-size chunks.
///
/// # Type Parameters
/// * `SR` - SpreadsheetReader implementation
/// * `IR` - IncidentRepository implementation
/// * `PR` - ProgressReporter implementation
pub struct ImportIncidentsUseCase<SR, IR, PR> {
    spreadsheet_reader: SR,
    incident_repository: IR,
    progress_reporter: PR,
}

impl<SR, IR, PR> ImportIncidentsUseCase<SR, IR, PR>
where
    SR: SpreadsheetReader,
    IR: IncidentRepository,
    PR: ProgressReporter,
{
    /// Creates a new ImportIncidentsUseCase with injected dependencies
    pub fn new(spreadsheet_reader: SR, incident_repository: IR, progress_reporter: PR) -> Self {
        Self {
            spreadsheet_reader,
            incident_repository,
            progress_reporter,
        }
    }

    /// Executes the import
    ///
    /// # Errors
    /// Returns an error if:
    /// - The chunk size is zero
    /// - The spreadsheet cannot be read or has no header row
    /// - No row carries a sample id (`AuditError::NoImportableRecords`)
    /// - A chunk is rejected by the store; earlier chunks stay written
    pub async fn execute(&self, request: ImportRequest) -> Result<ImportResponse> {
        if request.chunk_size == 0 {
            anyhow::bail!(AuditError::Validation {
                message: "Chunk size must be greater than 0".to_string(),
            });
        }

        // Step 1: Read and map the sheet
        let mapping = self.read_and_map(&request)?;

        // Step 2: Warn about rows that will not show up in the worklist
        let status_summary = self.check_statuses(&mapping.incidents);

        let parsed = mapping.incidents.len();
        let preview: Vec<Incident> = mapping.incidents.iter().take(PREVIEW_SIZE).cloned().collect();

        // Step 3: One record per sample id, last row wins
        let outcome = self.deduplicate(mapping.incidents);
        if outcome.unique.is_empty() {
            return Err(AuditError::NoImportableRecords { parsed }.into());
        }

        // Step 4: Persist unless this is a dry run
        let upserted = if request.dry_run {
            self.progress_reporter.report_completion(&format!(
                "Dry run: {} incident(s) ready to import. Nothing was written.",
                outcome.unique.len()
            ));
            0
        } else {
            let upserted = self.upsert_in_chunks(&outcome.unique, request.chunk_size).await?;
            self.progress_reporter
                .report_completion(&format!("✅ Imported {} incident(s)", upserted));
            upserted
        };

        Ok(ImportResponse {
            parsed,
            discarded_rows: mapping.discarded_rows,
            missing_columns: mapping.missing_columns.iter().map(|c| c.to_string()).collect(),
            unique: outcome.unique.len(),
            duplicates_removed: outcome.duplicates_removed,
            missing_key: outcome.missing_key,
            upserted,
            dry_run: request.dry_run,
            status_summary,
            preview,
        })
    }

    fn read_and_map(&self, request: &ImportRequest) -> Result<SheetMapping> {
        self.progress_reporter.report(&format!(
            "📖 Reading spreadsheet: {}",
            request.spreadsheet_path.display()
        ));

        let rows = self.spreadsheet_reader.read_rows(&request.spreadsheet_path)?;
        let mapping = SheetMapper::map(&rows).map_err(|e| AuditError::SpreadsheetParseError {
            path: request.spreadsheet_path.clone(),
            details: e.to_string(),
        })?;

        tracing::debug!(
            rows = rows.len(),
            mapped = mapping.incidents.len(),
            discarded = mapping.discarded_rows,
            missing_columns = ?mapping.missing_columns,
            "sheet mapped"
        );

        self.progress_reporter
            .report(&format!("✅ Read {} record(s)", mapping.incidents.len()));
        if mapping.discarded_rows > 0 {
            self.progress_reporter.report(&format!(
                "🚫 Skipped {} row(s) without sample id and indicator",
                mapping.discarded_rows
            ));
        }

        Ok(mapping)
    }

    fn check_statuses(&self, incidents: &[Incident]) -> StatusSummary {
        let summary = ComplianceStatusPolicy::evaluate(incidents);
        if let Some(warning) = summary.warning() {
            self.progress_reporter.report_warning(&warning);
        }
        summary
    }

    fn deduplicate(&self, incidents: Vec<Incident>) -> DeduplicationOutcome {
        let outcome = IncidentDeduplicator::deduplicate(incidents);

        if outcome.duplicates_removed > 0 {
            self.progress_reporter.report(&format!(
                "🔁 Collapsed {} duplicate row(s) by ID_MOSTRA (last row wins)",
                outcome.duplicates_removed
            ));
        }
        if outcome.missing_key > 0 {
            self.progress_reporter.report_warning(&format!(
                "{} record(s) have no ID_MOSTRA and will not be imported",
                outcome.missing_key
            ));
        }

        outcome
    }

    /// Sends the incidents in order; the first failing chunk stops the import
    async fn upsert_in_chunks(&self, incidents: &[Incident], chunk_size: usize) -> Result<usize> {
        let total_chunks = incidents.len().div_ceil(chunk_size);
        let mut upserted = 0;

        self.progress_reporter.report(&format!(
            "⬆️  Uploading {} incident(s) in {} chunk(s)...",
            incidents.len(),
            total_chunks
        ));

        for (index, chunk) in incidents.chunks(chunk_size).enumerate() {
            let written = match self.incident_repository.upsert_batch(chunk).await {
                Ok(written) => written,
                Err(e) => {
                    self.progress_reporter.report_error(&format!(
                        "❌ Chunk {}/{} failed after {} incident(s) were written",
                        index + 1,
                        total_chunks,
                        upserted
                    ));
                    return Err(e).with_context(|| {
                        format!("Failed to upsert chunk {}/{}", index + 1, total_chunks)
                    });
                }
            };

            upserted += written;
            tracing::debug!(chunk = index + 1, total_chunks, written, "chunk upserted");
            self.progress_reporter.report_progress(
                index + 1,
                total_chunks,
                Some(&format!("{} incident(s) written", upserted)),
            );
        }

        Ok(upserted)
    }
}
