use super::dashboard_aggregator::{rank, CountBucket, TOP_N};
use crate::audit::domain::{Collaborator, Incident};
use serde::Serialize;
use std::collections::HashMap;

/// How many offenders the ranking keeps
pub const RANKING_SIZE: usize = 10;

/// Reason label for treated incidents saved without a reason
pub const NO_REASON_LABEL: &str = "No reason";

/// Name shown for logins missing from the collaborator directory
pub const UNKNOWN_COLLABORATOR: &str = "Unknown";

const FEEDBACK_SUBJECT: &str = "Quality feedback";
const FEEDBACK_BODY: &str = "Hello,\n\nWe found some points of attention in your recent service tickets. Please reach out to your supervisor to align on them.";

/// Feedback counters over the treated incidents
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedbackKpis {
    pub total_audited: usize,
    pub feedback_sent: usize,
    /// Share of audited incidents with feedback sent, one decimal ("0" when nothing was audited)
    pub feedback_percentage: String,
    /// Distinct offender logins
    pub offenders_identified: usize,
}

/// One row of the offender ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OffenderTally {
    pub login: String,
    pub name: String,
    pub email: Option<String>,
    pub count: usize,
    pub top_reason: String,
}

/// OffenderRanking - Per-offender statistics over treated incidents
pub struct OffenderRanking;

impl OffenderRanking {
    pub fn kpis(treated: &[Incident]) -> FeedbackKpis {
        let total_audited = treated.len();
        let feedback_sent = treated.iter().filter(|i| i.audit.feedback_sent).count();
        let feedback_percentage = if total_audited > 0 {
            format!(
                "{:.1}",
                feedback_sent as f64 / total_audited as f64 * 100.0
            )
        } else {
            "0".to_string()
        };

        FeedbackKpis {
            total_audited,
            feedback_sent,
            feedback_percentage,
            offenders_identified: Self::tally(treated).len(),
        }
    }

    /// Top offenders by incident count, joined with the collaborator directory
    ///
    /// # Arguments
    /// * `treated` - Treated incidents
    /// * `lookup` - Resolves an upper-cased login to a collaborator
    pub fn rank<F>(treated: &[Incident], lookup: F) -> Vec<OffenderTally>
    where
        F: Fn(&str) -> Option<Collaborator>,
    {
        let mut rows: Vec<OffenderTally> = Self::tally(treated)
            .into_iter()
            .map(|(login, reasons)| {
                let count = reasons.values().sum();
                let top_reason = rank(reasons, Some(1))
                    .into_iter()
                    .next()
                    .map(|bucket| bucket.label)
                    .unwrap_or_else(|| "-".to_string());
                let collaborator = lookup(&login);

                OffenderTally {
                    name: collaborator
                        .as_ref()
                        .map(|c| c.name.clone())
                        .unwrap_or_else(|| UNKNOWN_COLLABORATOR.to_string()),
                    email: collaborator.and_then(|c| c.email),
                    login,
                    count,
                    top_reason,
                }
            })
            .collect();

        rows.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.login.cmp(&b.login)));
        rows.truncate(RANKING_SIZE);
        rows
    }

    /// Most frequent non-empty reasons, top 5
    pub fn top_reasons(treated: &[Incident]) -> Vec<CountBucket> {
        let mut counts = HashMap::new();
        for reason in treated
            .iter()
            .filter_map(|i| i.audit.reason.as_deref())
            .filter(|r| !r.trim().is_empty())
        {
            *counts.entry(reason.to_string()).or_insert(0) += 1;
        }
        rank(counts, Some(TOP_N))
    }

    /// `mailto:` link asking the collaborator to talk to their supervisor
    pub fn feedback_mailto(email: &str) -> String {
        format!(
            "mailto:{}?subject={}&body={}",
            email,
            urlencoding::encode(FEEDBACK_SUBJECT),
            urlencoding::encode(FEEDBACK_BODY)
        )
    }

    /// login -> reason -> count
    fn tally(treated: &[Incident]) -> HashMap<String, HashMap<String, usize>> {
        let mut offenders: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for incident in treated {
            let Some(login) = incident.audit.normalized_offender() else {
                continue;
            };
            let reason = incident
                .audit
                .reason
                .clone()
                .filter(|r| !r.trim().is_empty())
                .unwrap_or_else(|| NO_REASON_LABEL.to_string());
            *offenders
                .entry(login)
                .or_default()
                .entry(reason)
                .or_insert(0) += 1;
        }
        offenders
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::domain::{AuditOverlay, AuditStatus};

    fn treated(offender: Option<&str>, reason: Option<&str>, feedback_sent: bool) -> Incident {
        Incident {
            audit: AuditOverlay {
                status: AuditStatus::Treated,
                corrected: Some(false),
                offender_login: offender.map(str::to_string),
                reason: reason.map(str::to_string),
                feedback_sent,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn directory(login: &str) -> Option<Collaborator> {
        match login {
            "JSILVA" => Some(Collaborator::new(
                "João Silva",
                Some("joao.silva@example.com".to_string()),
            )),
            "MSOUZA" => Some(Collaborator::new("Maria Souza", None)),
            _ => None,
        }
    }

    #[test]
    fn test_kpis_round_to_one_decimal() {
        let incidents = vec![
            treated(Some("a"), Some("x"), true),
            treated(Some("a"), Some("x"), false),
            treated(Some("b"), Some("x"), false),
        ];

        let kpis = OffenderRanking::kpis(&incidents);
        assert_eq!(kpis.total_audited, 3);
        assert_eq!(kpis.feedback_sent, 1);
        assert_eq!(kpis.feedback_percentage, "33.3");
        assert_eq!(kpis.offenders_identified, 2);
    }

    #[test]
    fn test_kpis_without_audits() {
        let kpis = OffenderRanking::kpis(&[]);
        assert_eq!(kpis.total_audited, 0);
        assert_eq!(kpis.feedback_percentage, "0");
    }

    #[test]
    fn test_rank_joins_directory_and_picks_top_reason() {
        let incidents = vec![
            treated(Some(" jsilva"), Some("wrong code"), false),
            treated(Some("JSILVA"), Some("wrong code"), false),
            treated(Some("jsilva"), Some("late closing"), false),
            treated(Some("msouza"), None, false),
            treated(Some("xyz"), Some("late closing"), false),
            treated(None, Some("no offender"), false),
        ];

        let ranking = OffenderRanking::rank(&incidents, directory);
        assert_eq!(ranking.len(), 3);

        assert_eq!(ranking[0].login, "JSILVA");
        assert_eq!(ranking[0].count, 3);
        assert_eq!(ranking[0].top_reason, "wrong code");
        assert_eq!(ranking[0].name, "João Silva");
        assert_eq!(ranking[0].email.as_deref(), Some("joao.silva@example.com"));

        assert_eq!(ranking[1].login, "MSOUZA");
        assert_eq!(ranking[1].top_reason, NO_REASON_LABEL);
        assert!(ranking[1].email.is_none());

        assert_eq!(ranking[2].name, UNKNOWN_COLLABORATOR);
    }

    #[test]
    fn test_rank_keeps_top_ten() {
        let incidents: Vec<Incident> = (0..15)
            .map(|n| treated(Some(&format!("op{:02}", n)), Some("x"), false))
            .collect();

        let ranking = OffenderRanking::rank(&incidents, |_| None);
        assert_eq!(ranking.len(), RANKING_SIZE);
        assert_eq!(ranking[0].login, "OP00");
    }

    #[test]
    fn test_top_reasons_ignores_blank_reasons() {
        let incidents = vec![
            treated(None, Some("a"), false),
            treated(None, Some("b"), false),
            treated(None, Some("b"), false),
            treated(None, Some("  "), false),
            treated(None, None, false),
        ];

        let reasons = OffenderRanking::top_reasons(&incidents);
        assert_eq!(reasons.len(), 2);
        assert_eq!(reasons[0].label, "b");
        assert_eq!(reasons[0].count, 2);
    }

    #[test]
    fn test_feedback_mailto_is_url_encoded() {
        let link = OffenderRanking::feedback_mailto("ana@example.com");
        assert!(link.starts_with("mailto:ana@example.com?subject=Quality%20feedback&body="));
        assert!(!link.contains(' '));
        assert!(link.contains("%0A%0A"));
    }
}
