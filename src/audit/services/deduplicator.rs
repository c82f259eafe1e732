use crate::audit::domain::{Incident, SampleId};
use std::collections::HashMap;

/// Outcome of collapsing a batch onto its sample ids
#[derive(Debug, Clone, Default)]
pub struct DeduplicationOutcome {
    /// One incident per sample id, in first-seen order, holding the last row's values
    pub unique: Vec<Incident>,
    /// Rows replaced by a later row with the same sample id
    pub duplicates_removed: usize,
    /// Rows that have no sample id and therefore cannot be persisted
    pub missing_key: usize,
}

/// IncidentDeduplicator - Upsert-by-key semantics applied inside one batch
pub struct IncidentDeduplicator;

impl IncidentDeduplicator {
    pub fn deduplicate(incidents: Vec<Incident>) -> DeduplicationOutcome {
        let mut positions: HashMap<SampleId, usize> = HashMap::new();
        let mut outcome = DeduplicationOutcome::default();

        for incident in incidents {
            let Some(key) = incident.sample_id.clone() else {
                outcome.missing_key += 1;
                continue;
            };

            match positions.get(&key) {
                Some(&position) => {
                    outcome.unique[position] = incident;
                    outcome.duplicates_removed += 1;
                }
                None => {
                    positions.insert(key, outcome.unique.len());
                    outcome.unique.push(incident);
                }
            }
        }

        outcome
    }
}
