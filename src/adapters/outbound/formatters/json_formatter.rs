use crate::application::dto::ImportResponse;
use crate::application::read_models::{DashboardReadModel, OffenderReport, WorklistView};
use crate::ports::outbound::ReportFormatter;
use crate::shared::Result;
use serde::Serialize;

/// JsonFormatter adapter emitting the read models as pretty-printed JSON
pub struct JsonFormatter;

impl JsonFormatter {
    pub fn new() -> Self {
        Self
    }

    fn render<T: Serialize>(value: &T) -> Result<String> {
        Ok(serde_json::to_string_pretty(value)?)
    }
}

impl Default for JsonFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportFormatter for JsonFormatter {
    fn format_dashboard(&self, model: &DashboardReadModel) -> Result<String> {
        Self::render(model)
    }

    fn format_offender_report(&self, report: &OffenderReport) -> Result<String> {
        Self::render(report)
    }

    fn format_worklist(&self, view: &WorklistView) -> Result<String> {
        Self::render(view)
    }

    fn format_import_summary(&self, response: &ImportResponse) -> Result<String> {
        Self::render(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::read_models::DashboardKpis;
    use crate::application::worklist::WorklistFilter;
    use crate::audit::services::{DashboardAggregator, OffenderRanking};
    use chrono::FixedOffset;

    #[test]
    fn test_dashboard_json_has_kpis() {
        let aggregator = DashboardAggregator::new(FixedOffset::east_opt(0).unwrap());
        let model = DashboardReadModel::build(
            DashboardKpis {
                total: 4,
                pending: 3,
                treated: 1,
            },
            &[],
            &aggregator,
        );

        let json = JsonFormatter::new().format_dashboard(&model).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kpis"]["total"], 4);
        assert_eq!(value["kpis"]["treated"], 1);
        assert!(value["solution_pareto"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_worklist_filter_serializes_lowercase() {
        let view = WorklistView {
            filter: WorklistFilter::Pending,
            search: None,
            loaded: 0,
            incidents: vec![],
        };

        let json = JsonFormatter::new().format_worklist(&view).unwrap();
        assert!(json.contains("\"filter\": \"pending\""));
    }

    #[test]
    fn test_offender_report_json() {
        let report = OffenderReport::new(OffenderRanking::kpis(&[]), vec![], vec![]);
        let json = JsonFormatter::new().format_offender_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["kpis"]["feedback_percentage"], "0");
    }
}
