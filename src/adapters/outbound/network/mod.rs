/// Network adapters for the hosted backend (REST, storage, auth, functions)
mod auth_profile_repository;
mod backend_client;
mod function_account_provisioner;
mod rest_incident_repository;
mod storage_evidence_store;

pub use auth_profile_repository::AuthProfileRepository;
pub use backend_client::{BackendClient, BackendSettings};
pub use function_account_provisioner::FunctionAccountProvisioner;
pub use rest_incident_repository::{RestIncidentRepository, DEFAULT_INCIDENTS_TABLE};
pub use storage_evidence_store::{StorageEvidenceStore, DEFAULT_EVIDENCE_BUCKET};
