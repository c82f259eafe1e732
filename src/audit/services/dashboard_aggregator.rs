use crate::audit::domain::Incident;
use chrono::{FixedOffset, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// How many entries the "top N" charts keep
pub const TOP_N: usize = 5;

/// How many resolutions the Pareto chart keeps
pub const PARETO_SIZE: usize = 10;

/// Symptoms longer than this are truncated for display
const SYMPTOM_LABEL_CHARS: usize = 20;

/// Resolution texts longer than this are truncated for display
const SOLUTION_LABEL_CHARS: usize = 30;

/// A label with how many incidents fall under it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CountBucket {
    pub label: String,
    pub count: usize,
}

/// Corrections saved on one calendar day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: usize,
}

/// One bar of the resolution Pareto chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParetoEntry {
    pub label: String,
    pub count: usize,
    /// Running share of the total, rounded to an integer percentage
    pub cumulative_percentage: u32,
}

/// DashboardAggregator - Builds chart datasets from an in-memory incident list
///
/// Every function is a single pass that groups by a key into a counter map,
/// then sorts and truncates. Equal counts are ordered by label so the output
/// does not depend on hash order.
pub struct DashboardAggregator {
    offset: FixedOffset,
}

impl DashboardAggregator {
    /// Creates an aggregator that buckets audit timestamps in the given UTC offset
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Treated incidents per calendar day of their audit timestamp, oldest first
    pub fn corrections_per_day(&self, incidents: &[Incident]) -> Vec<DailyCount> {
        let mut counts: BTreeMap<NaiveDate, usize> = BTreeMap::new();
        for incident in incidents.iter().filter(|i| i.audit.status.is_treated()) {
            if let Some(audited_at) = incident.audit.audited_at {
                let day = audited_at.with_timezone(&self.offset).date_naive();
                *counts.entry(day).or_insert(0) += 1;
            }
        }

        counts
            .into_iter()
            .map(|(date, count)| DailyCount { date, count })
            .collect()
    }

    /// Treated incidents grouped by upper-cased offender login, top 5
    pub fn top_offenders(&self, incidents: &[Incident]) -> Vec<CountBucket> {
        let counts = count_by(
            incidents.iter().filter(|i| i.audit.status.is_treated()),
            |i| {
                i.audit
                    .offender_login
                    .as_deref()
                    .filter(|login| !login.is_empty())
                    .map(str::to_uppercase)
            },
        );
        rank(counts, Some(TOP_N))
    }

    /// Incidents per year-month key, ascending by key
    pub fn monthly_volume(&self, incidents: &[Incident]) -> Vec<CountBucket> {
        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for key in incidents.iter().filter_map(|i| i.year_month.clone()) {
            *counts.entry(key).or_insert(0) += 1;
        }

        counts
            .into_iter()
            .map(|(label, count)| CountBucket { label, count })
            .collect()
    }

    /// Treated incidents split into corrected / not corrected; empty buckets are dropped
    pub fn status_distribution(&self, incidents: &[Incident]) -> Vec<CountBucket> {
        let (corrected, not_corrected) = incidents
            .iter()
            .filter(|i| i.audit.status.is_treated())
            .fold((0, 0), |(yes, no), i| {
                if i.audit.corrected == Some(true) {
                    (yes + 1, no)
                } else {
                    (yes, no + 1)
                }
            });

        [("Corrected", corrected), ("Not corrected", not_corrected)]
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(label, count)| CountBucket {
                label: label.to_string(),
                count,
            })
            .collect()
    }

    /// Incidents per group, top 5
    pub fn top_groups(&self, incidents: &[Incident]) -> Vec<CountBucket> {
        let counts = count_by(incidents.iter(), |i| normalized(i.group.as_deref()));
        rank(counts, Some(TOP_N))
    }

    /// Incidents per symptom (label truncated to 20 characters), top 5
    pub fn top_symptoms(&self, incidents: &[Incident]) -> Vec<CountBucket> {
        let counts = count_by(incidents.iter(), |i| {
            normalized(i.symptom.as_deref()).map(|s| truncate_label(&s, SYMPTOM_LABEL_CHARS))
        });
        rank(counts, Some(TOP_N))
    }

    /// Incidents per opening tool, all tools
    pub fn tools_distribution(&self, incidents: &[Incident]) -> Vec<CountBucket> {
        let counts = count_by(incidents.iter(), |i| normalized(i.opening_tool.as_deref()));
        rank(counts, None)
    }

    /// Pareto of resolution texts over corrected, treated incidents, top 10
    ///
    /// Cumulative percentages are taken over every resolution, so the last
    /// kept entry may stay below 100%.
    pub fn solution_pareto(&self, incidents: &[Incident]) -> Vec<ParetoEntry> {
        let counts = count_by(
            incidents
                .iter()
                .filter(|i| i.audit.status.is_treated() && i.audit.corrected == Some(true)),
            |i| {
                normalized(i.solution.as_deref()).map(|s| truncate_label(&s, SOLUTION_LABEL_CHARS))
            },
        );

        let total: usize = counts.values().sum();
        if total == 0 {
            return Vec::new();
        }

        let mut accumulated = 0;
        rank(counts, None)
            .into_iter()
            .map(|bucket| {
                accumulated += bucket.count;
                ParetoEntry {
                    cumulative_percentage: ((accumulated as f64 / total as f64) * 100.0).round()
                        as u32,
                    label: bucket.label,
                    count: bucket.count,
                }
            })
            .take(PARETO_SIZE)
            .collect()
    }
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_uppercase())
        .filter(|v| !v.is_empty())
}

fn truncate_label(label: &str, max_chars: usize) -> String {
    if label.chars().count() > max_chars {
        let head: String = label.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        label.to_string()
    }
}

fn count_by<'a, I, F>(incidents: I, key: F) -> HashMap<String, usize>
where
    I: Iterator<Item = &'a Incident>,
    F: Fn(&Incident) -> Option<String>,
{
    let mut counts = HashMap::new();
    for label in incidents.filter_map(key) {
        *counts.entry(label).or_insert(0) += 1;
    }
    counts
}

/// Sorts by count descending, then label ascending, keeping at most `limit`
pub(crate) fn rank(counts: HashMap<String, usize>, limit: Option<usize>) -> Vec<CountBucket> {
    let mut buckets: Vec<CountBucket> = counts
        .into_iter()
        .map(|(label, count)| CountBucket { label, count })
        .collect();
    buckets.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    if let Some(limit) = limit {
        buckets.truncate(limit);
    }
    buckets
}
