use crate::adapters::outbound::memory::{
    InMemoryAccountDirectory, InMemoryIncidentRepository, StoredAccount,
};
use crate::audit::domain::{Incident, Role};
use crate::ports::outbound::{EvidenceFile, EvidenceStore};
use crate::shared::error::AuditError;
use crate::shared::security::read_checked;
use crate::shared::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Login of the operator signed in to an offline store
pub const LOCAL_OPERATOR_LOGIN: &str = "LOCAL";

/// Largest store file accepted (200 MB)
const MAX_STORE_SIZE: u64 = 200 * 1024 * 1024;

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreSnapshot {
    #[serde(default)]
    incidents: Vec<Incident>,
    #[serde(default)]
    accounts: Vec<StoredAccount>,
}

/// LocalStore - JSON file standing in for the hosted backend
///
/// Loads the file into the in-memory adapters and writes it back on
/// [`save`](Self::save). The local operator is always signed in with the
/// admin role. Evidence images are written next to the store file.
pub struct LocalStore {
    path: PathBuf,
    incidents: InMemoryIncidentRepository,
    accounts: InMemoryAccountDirectory,
}

impl LocalStore {
    /// Opens the store, starting empty when the file does not exist yet
    pub fn open(path: &Path) -> Result<Self> {
        let snapshot = if path.exists() {
            let bytes = read_checked(path, "local store", MAX_STORE_SIZE)?;
            serde_json::from_slice::<StoreSnapshot>(&bytes).map_err(|e| AuditError::FileReadError {
                path: path.to_path_buf(),
                details: format!("Invalid local store: {}", e),
            })?
        } else {
            StoreSnapshot::default()
        };

        tracing::debug!(
            path = %path.display(),
            incidents = snapshot.incidents.len(),
            accounts = snapshot.accounts.len(),
            "local store opened"
        );

        let accounts = InMemoryAccountDirectory::from_accounts(snapshot.accounts);
        accounts.add_account(LOCAL_OPERATOR_LOGIN, Role::Admin);
        accounts.sign_in(LOCAL_OPERATOR_LOGIN);

        Ok(Self {
            path: path.to_path_buf(),
            incidents: InMemoryIncidentRepository::from_incidents(snapshot.incidents),
            accounts,
        })
    }

    pub fn incidents(&self) -> InMemoryIncidentRepository {
        self.incidents.clone()
    }

    pub fn accounts(&self) -> InMemoryAccountDirectory {
        self.accounts.clone()
    }

    /// Evidence images go to `<store file stem>-evidence/` beside the store
    pub fn evidence(&self) -> LocalEvidenceStore {
        let stem = self
            .path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "store".to_string());
        let dir = self
            .path
            .with_file_name(format!("{}-evidence", stem));
        LocalEvidenceStore::new(dir)
    }

    /// Writes the current state back to the store file
    pub fn save(&self) -> Result<()> {
        let snapshot = StoreSnapshot {
            incidents: self.incidents.snapshot(),
            accounts: self.accounts.accounts(),
        };
        let json = serde_json::to_string_pretty(&snapshot)?;

        // write-then-rename so an interrupted save keeps the previous file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json)
            .and_then(|_| fs::rename(&tmp_path, &self.path))
            .map_err(|e| AuditError::FileWriteError {
                path: self.path.clone(),
                details: e.to_string(),
            })?;
        Ok(())
    }
}

/// LocalEvidenceStore adapter writing evidence images to a directory
pub struct LocalEvidenceStore {
    root: PathBuf,
}

impl LocalEvidenceStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }
}

#[async_trait]
impl EvidenceStore for LocalEvidenceStore {
    async fn upload(&self, object_path: &str, file: &EvidenceFile) -> Result<String> {
        let relative = Path::new(object_path);
        if !relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
        {
            return Err(AuditError::SecurityError {
                path: relative.to_path_buf(),
                reason: "Evidence path must stay inside the evidence directory".to_string(),
                hint: "Incident ids must not contain path separators or '..'".to_string(),
            }
            .into());
        }

        let target = self.root.join(relative);
        let write = || -> std::io::Result<PathBuf> {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&target, &file.bytes)?;
            target.canonicalize()
        };

        let absolute = write().map_err(|e| AuditError::FileWriteError {
            path: target.clone(),
            details: e.to_string(),
        })?;
        Ok(format!("file://{}", absolute.display()))
    }
}
