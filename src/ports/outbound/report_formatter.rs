use crate::application::dto::ImportResponse;
use crate::application::read_models::{DashboardReadModel, OffenderReport, WorklistView};
use crate::shared::Result;

/// ReportFormatter port for rendering results
///
/// One implementation per output format (JSON, Markdown).
pub trait ReportFormatter {
    /// Renders the dashboard KPIs and chart datasets
    fn format_dashboard(&self, model: &DashboardReadModel) -> Result<String>;

    /// Renders the offender report
    fn format_offender_report(&self, report: &OffenderReport) -> Result<String>;

    /// Renders a filtered view of the audit worklist
    fn format_worklist(&self, view: &WorklistView) -> Result<String>;

    /// Renders the outcome of a spreadsheet import
    ///
    /// # Errors
    /// Returns an error if serialization fails
    fn format_import_summary(&self, response: &ImportResponse) -> Result<String>;
}
