//! Offender report read model

use crate::audit::services::{CountBucket, FeedbackKpis, OffenderRanking, OffenderTally};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One ranked offender, with a ready-made feedback link when an e-mail is known
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffenderRow {
    /// 1-based position in the ranking
    pub rank: usize,
    #[serde(flatten)]
    pub tally: OffenderTally,
    pub feedback_mailto: Option<String>,
}

/// Performance report over treated incidents
#[derive(Debug, Clone, Serialize)]
pub struct OffenderReport {
    pub generated_at: DateTime<Utc>,
    pub kpis: FeedbackKpis,
    pub ranking: Vec<OffenderRow>,
    pub top_reasons: Vec<CountBucket>,
}

impl OffenderReport {
    pub fn new(kpis: FeedbackKpis, ranking: Vec<OffenderTally>, top_reasons: Vec<CountBucket>) -> Self {
        let ranking = ranking
            .into_iter()
            .enumerate()
            .map(|(index, tally)| OffenderRow {
                rank: index + 1,
                feedback_mailto: tally.email.as_deref().map(OffenderRanking::feedback_mailto),
                tally,
            })
            .collect();

        Self {
            generated_at: Utc::now(),
            kpis,
            ranking,
            top_reasons,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tally(login: &str, email: Option<&str>) -> OffenderTally {
        OffenderTally {
            login: login.to_string(),
            name: "Someone".to_string(),
            email: email.map(str::to_string),
            count: 1,
            top_reason: "x".to_string(),
        }
    }

    #[test]
    fn test_rows_are_numbered_and_linked() {
        let kpis = OffenderRanking::kpis(&[]);
        let report = OffenderReport::new(
            kpis,
            vec![tally("A", Some("a@example.com")), tally("B", None)],
            vec![],
        );

        assert_eq!(report.ranking[0].rank, 1);
        assert!(report.ranking[0]
            .feedback_mailto
            .as_deref()
            .unwrap()
            .starts_with("mailto:a@example.com?"));
        assert_eq!(report.ranking[1].rank, 2);
        assert!(report.ranking[1].feedback_mailto.is_none());
    }

    #[test]
    fn test_row_serializes_flat() {
        let report = OffenderReport::new(OffenderRanking::kpis(&[]), vec![tally("A", None)], vec![]);
        let json = serde_json::to_value(&report.ranking[0]).unwrap();
        assert_eq!(json["login"], "A");
        assert_eq!(json["rank"], 1);
    }
}
