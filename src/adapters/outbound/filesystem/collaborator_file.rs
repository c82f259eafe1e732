use crate::audit::domain::Collaborator;
use crate::ports::outbound::CollaboratorDirectory;
use crate::shared::error::AuditError;
use crate::shared::security::read_checked;
use crate::shared::Result;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

/// Largest collaborator directory file accepted (1 MB)
const MAX_DIRECTORY_SIZE: u64 = 1024 * 1024;

#[derive(Debug, Default, Deserialize)]
struct DirectoryFile {
    #[serde(default)]
    collaborators: HashMap<String, Collaborator>,
}

/// TomlCollaboratorDirectory adapter reading operators from a TOML file
///
/// ```toml
/// [collaborators.JSILVA]
/// name = "João Silva"
/// email = "joao.silva@example.com"
/// ```
#[derive(Debug, Clone, Default)]
pub struct TomlCollaboratorDirectory {
    entries: HashMap<String, Collaborator>,
}

impl TomlCollaboratorDirectory {
    /// Directory without any entry; every login resolves to "Unknown"
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = read_checked(path, "collaborator directory", MAX_DIRECTORY_SIZE)?;
        let text = String::from_utf8(bytes).map_err(|e| AuditError::FileReadError {
            path: path.to_path_buf(),
            details: e.to_string(),
        })?;
        Self::parse(&text).map_err(|e| {
            AuditError::FileReadError {
                path: path.to_path_buf(),
                details: format!("Invalid collaborator directory: {}", e),
            }
            .into()
        })
    }

    fn parse(text: &str) -> std::result::Result<Self, toml::de::Error> {
        let file: DirectoryFile = toml::from_str(text)?;
        let entries = file
            .collaborators
            .into_iter()
            .map(|(login, collaborator)| (login.trim().to_uppercase(), collaborator))
            .collect();
        Ok(Self { entries })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CollaboratorDirectory for TomlCollaboratorDirectory {
    fn lookup(&self, login: &str) -> Option<Collaborator> {
        self.entries.get(&login.trim().to_uppercase()).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const DIRECTORY: &str = r#"
[collaborators.jsilva]
name = "João Silva"
email = "joao.silva@example.com"

[collaborators.MSOUZA]
name = "Maria Souza"
"#;

    #[test]
    fn test_lookup_is_case_insensitive() {
        let directory = TomlCollaboratorDirectory::parse(DIRECTORY).unwrap();
        assert_eq!(directory.len(), 2);

        let joao = directory.lookup("JSILVA").unwrap();
        assert_eq!(joao.name, "João Silva");
        assert_eq!(joao.email.as_deref(), Some("joao.silva@example.com"));

        let maria = directory.lookup("msouza").unwrap();
        assert!(maria.email.is_none());

        assert!(directory.lookup("NOBODY").is_none());
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("collaborators.toml");
        fs::write(&path, DIRECTORY).unwrap();

        let directory = TomlCollaboratorDirectory::load(&path).unwrap();
        assert!(directory.lookup("JSILVA").is_some());
    }

    #[test]
    fn test_invalid_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("collaborators.toml");
        fs::write(&path, "[collaborators.X]\nemail = 3").unwrap();

        let err = TomlCollaboratorDirectory::load(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid collaborator directory"));
    }

    #[test]
    fn test_empty_directory() {
        assert!(TomlCollaboratorDirectory::empty().lookup("A").is_none());
    }
}
