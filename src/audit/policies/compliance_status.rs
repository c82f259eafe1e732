use crate::audit::domain::{Incident, NON_COMPLIANT_STATUS};
use serde::Serialize;
use std::collections::BTreeMap;

/// Label used for rows whose indicator status is blank
const EMPTY_STATUS_LABEL: &str = "EMPTY";

/// Breakdown of imported rows by indicator status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusSummary {
    /// Rows that will show up in the audit worklist
    pub non_compliant: usize,
    /// Every other status, upper-cased, with its row count
    pub other_statuses: BTreeMap<String, usize>,
}

impl StatusSummary {
    pub fn total(&self) -> usize {
        self.non_compliant + self.other_statuses.values().sum::<usize>()
    }

    pub fn has_warnings(&self) -> bool {
        self.warning().is_some()
    }

    /// Warning to show the user, if any. Never blocks the import.
    pub fn warning(&self) -> Option<String> {
        if self.total() == 0 || self.other_statuses.is_empty() {
            return None;
        }

        if self.non_compliant == 0 {
            let found = self
                .other_statuses
                .keys()
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            return Some(format!(
                "No \"{}\" rows found. Only incidents with this status appear in the audit worklist. Statuses found: {}",
                NON_COMPLIANT_STATUS, found
            ));
        }

        let found = self
            .other_statuses
            .iter()
            .map(|(status, count)| format!("{} ({})", status, count))
            .collect::<Vec<_>>()
            .join(", ");
        let others: usize = self.other_statuses.values().sum();
        Some(format!(
            "{} row(s) have a status other than \"{}\" and will not appear in the audit worklist. Found: {}",
            others, NON_COMPLIANT_STATUS, found
        ))
    }
}

/// ComplianceStatusPolicy - Checks which imported rows reach the audit worklist
pub struct ComplianceStatusPolicy;

impl ComplianceStatusPolicy {
    pub fn evaluate(incidents: &[Incident]) -> StatusSummary {
        let mut summary = StatusSummary::default();

        for incident in incidents {
            if incident.is_non_compliant() {
                summary.non_compliant += 1;
                continue;
            }

            let status = incident
                .indicator_status
                .as_deref()
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| EMPTY_STATUS_LABEL.to_string());
            *summary.other_statuses.entry(status).or_insert(0) += 1;
        }

        summary
    }
}
