use crate::application::dto::ImportResponse;
use crate::application::read_models::{DashboardReadModel, OffenderReport, WorklistView};
use crate::audit::domain::Incident;
use crate::audit::services::CountBucket;
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use chrono::{DateTime, Utc};

/// Display format for calendar days
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Display format for timestamps
const DATETIME_FORMAT: &str = "%d/%m/%Y %H:%M";

const COUNT_TABLE_SEPARATOR: &str = "|-------|-------|\n";

const WORKLIST_TABLE_HEADER: &str =
    "| Id | Sample | Indicator | Group | Symptom | Status | Corrected | Offender | Created |\n";
const WORKLIST_TABLE_SEPARATOR: &str =
    "|----|--------|-----------|-------|---------|--------|-----------|----------|---------|\n";

const RANKING_TABLE_HEADER: &str =
    "| # | Login | Name | Incidents | Top reason | Feedback |\n";
const RANKING_TABLE_SEPARATOR: &str =
    "|---|-------|------|-----------|------------|----------|\n";

/// MarkdownFormatter adapter rendering the read models as Markdown tables
pub struct MarkdownFormatter;

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self
    }

    /// Escapes pipe characters and newlines for safe Markdown table rendering
    fn escape_markdown_table_cell(text: &str) -> String {
        text.replace('|', "\\|").replace('\n', " ")
    }

    fn cell(value: Option<&str>) -> String {
        value
            .filter(|v| !v.trim().is_empty())
            .map(Self::escape_markdown_table_cell)
            .unwrap_or_else(|| "-".to_string())
    }

    fn timestamp(value: &DateTime<Utc>) -> String {
        value.format(DATETIME_FORMAT).to_string()
    }

    fn render_counts(output: &mut String, title: &str, label_header: &str, buckets: &[CountBucket]) {
        output.push_str(&format!("## {}\n\n", title));
        if buckets.is_empty() {
            output.push_str("*No data*\n\n");
            return;
        }

        output.push_str(&format!("| {} | Count |\n", label_header));
        output.push_str(COUNT_TABLE_SEPARATOR);
        for bucket in buckets {
            output.push_str(&format!(
                "| {} | {} |\n",
                Self::escape_markdown_table_cell(&bucket.label),
                bucket.count
            ));
        }
        output.push('\n');
    }

    fn render_incident_row(output: &mut String, incident: &Incident) {
        let corrected = match incident.audit.corrected {
            Some(true) => "Yes",
            Some(false) => "No",
            None => "-",
        };
        output.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} | {} |\n",
            Self::cell(incident.id.as_deref()),
            Self::cell(incident.sample_id.as_ref().map(|id| id.as_str())),
            Self::cell(incident.indicator.as_deref()),
            Self::cell(incident.group.as_deref()),
            Self::cell(incident.symptom.as_deref()),
            incident.audit.status,
            corrected,
            Self::cell(incident.audit.offender_login.as_deref()),
            incident
                .created_at
                .as_ref()
                .map(Self::timestamp)
                .unwrap_or_else(|| "-".to_string()),
        ));
    }
}

impl Default for MarkdownFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for MarkdownFormatter {
    fn format_dashboard(&self, model: &DashboardReadModel) -> Result<String> {
        let mut output = String::new();
        output.push_str("# Quality Dashboard\n\n");
        output.push_str(&format!(
            "Generated at {}\n\n",
            Self::timestamp(&model.generated_at)
        ));

        output.push_str("| Total incidents | Pending | Treated |\n");
        output.push_str("|-----------------|---------|---------|\n");
        output.push_str(&format!(
            "| {} | {} | {} |\n\n",
            model.kpis.total, model.kpis.pending, model.kpis.treated
        ));

        output.push_str("## Corrections per day\n\n");
        if model.corrections_per_day.is_empty() {
            output.push_str("*No data*\n\n");
        } else {
            output.push_str("| Day | Count |\n");
            output.push_str(COUNT_TABLE_SEPARATOR);
            for day in &model.corrections_per_day {
                output.push_str(&format!(
                    "| {} | {} |\n",
                    day.date.format(DATE_FORMAT),
                    day.count
                ));
            }
            output.push('\n');
        }

        Self::render_counts(&mut output, "Top offenders", "Login", &model.top_offenders);
        Self::render_counts(&mut output, "Monthly volume", "Month", &model.monthly_volume);
        Self::render_counts(
            &mut output,
            "Status distribution",
            "Status",
            &model.status_distribution,
        );
        Self::render_counts(&mut output, "Top groups", "Group", &model.top_groups);
        Self::render_counts(&mut output, "Top symptoms", "Symptom", &model.top_symptoms);
        Self::render_counts(
            &mut output,
            "Opening tools",
            "Tool",
            &model.tools_distribution,
        );

        output.push_str("## Resolution Pareto\n\n");
        if model.solution_pareto.is_empty() {
            output.push_str("*No data*\n\n");
        } else {
            output.push_str("| Resolution | Count | Cumulative % |\n");
            output.push_str("|------------|-------|--------------|\n");
            for entry in &model.solution_pareto {
                output.push_str(&format!(
                    "| {} | {} | {}% |\n",
                    Self::escape_markdown_table_cell(&entry.label),
                    entry.count,
                    entry.cumulative_percentage
                ));
            }
            output.push('\n');
        }

        Ok(output)
    }

    fn format_offender_report(&self, report: &OffenderReport) -> Result<String> {
        let mut output = String::new();
        output.push_str("# Offender Report\n\n");

        let kpis = &report.kpis;
        output.push_str("| Audited | Feedback sent | Feedback % | Offenders identified |\n");
        output.push_str("|---------|---------------|------------|----------------------|\n");
        output.push_str(&format!(
            "| {} | {} | {}% | {} |\n\n",
            kpis.total_audited, kpis.feedback_sent, kpis.feedback_percentage, kpis.offenders_identified
        ));

        output.push_str("## Ranking\n\n");
        if report.ranking.is_empty() {
            output.push_str("*No offenders identified*\n\n");
        } else {
            output.push_str(RANKING_TABLE_HEADER);
            output.push_str(RANKING_TABLE_SEPARATOR);
            for row in &report.ranking {
                let feedback = match &row.feedback_mailto {
                    Some(link) => format!("[Send feedback]({})", link),
                    None => "-".to_string(),
                };
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {} | {} |\n",
                    row.rank,
                    Self::escape_markdown_table_cell(&row.tally.login),
                    Self::escape_markdown_table_cell(&row.tally.name),
                    row.tally.count,
                    Self::escape_markdown_table_cell(&row.tally.top_reason),
                    feedback
                ));
            }
            output.push('\n');
        }

        Self::render_counts(&mut output, "Top reasons", "Reason", &report.top_reasons);
        Ok(output)
    }

    fn format_worklist(&self, view: &WorklistView) -> Result<String> {
        let mut output = String::new();
        output.push_str("# Audit Worklist\n\n");
        output.push_str(&format!(
            "Filter: {}{} ({} of {} loaded)\n\n",
            view.filter,
            view.search
                .as_deref()
                .map(|s| format!(", search: \"{}\"", s))
                .unwrap_or_default(),
            view.incidents.len(),
            view.loaded
        ));

        if view.incidents.is_empty() {
            output.push_str("*No incidents match*\n");
            return Ok(output);
        }

        output.push_str(WORKLIST_TABLE_HEADER);
        output.push_str(WORKLIST_TABLE_SEPARATOR);
        for incident in &view.incidents {
            Self::render_incident_row(&mut output, incident);
        }
        Ok(output)
    }

    fn format_import_summary(&self, response: &ImportResponse) -> Result<String> {
        let mut output = String::new();
        output.push_str(if response.dry_run {
            "# Import Preview (dry run)\n\n"
        } else {
            "# Import Summary\n\n"
        });

        output.push_str("| Metric | Value |\n");
        output.push_str("|--------|-------|\n");
        output.push_str(&format!("| Rows read | {} |\n", response.parsed));
        output.push_str(&format!("| Blank rows discarded | {} |\n", response.discarded_rows));
        output.push_str(&format!("| Rows without ID_MOSTRA | {} |\n", response.missing_key));
        output.push_str(&format!("| Duplicates collapsed | {} |\n", response.duplicates_removed));
        output.push_str(&format!("| Unique incidents | {} |\n", response.unique));
        output.push_str(&format!(
            "| Non-compliant incidents | {} |\n",
            response.status_summary.non_compliant
        ));
        output.push_str(&format!("| Upserted | {} |\n\n", response.upserted));

        if !response.missing_columns.is_empty() {
            output.push_str(&format!(
                "Columns not found in the sheet: {}\n\n",
                response.missing_columns.join(", ")
            ));
        }

        if let Some(warning) = response.status_summary.warning() {
            output.push_str(&format!("> ⚠️ {}\n\n", warning));
        }

        if !response.preview.is_empty() {
            output.push_str(&format!("## Preview (first {} rows)\n\n", response.preview.len()));
            output.push_str(WORKLIST_TABLE_HEADER);
            output.push_str(WORKLIST_TABLE_SEPARATOR);
            for incident in &response.preview {
                Self::render_incident_row(&mut output, incident);
            }
        }

        Ok(output)
    }
}
