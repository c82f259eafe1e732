/// In-memory adapters for offline runs and tests
mod account_directory;
mod evidence_store;
mod incident_repository;

pub use account_directory::{InMemoryAccountDirectory, StoredAccount};
pub use evidence_store::InMemoryEvidenceStore;
pub use incident_repository::InMemoryIncidentRepository;
