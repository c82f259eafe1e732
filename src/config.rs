//! Configuration file support for audit-portal.
//!
//! Provides YAML-based configuration through `audit-portal.config.yml` files,
//! environment overrides for the backend credentials, and validation.

use anyhow::{bail, Context};
use chrono::FixedOffset;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::application::dto::{OutputFormat, DEFAULT_CHUNK_SIZE};
use crate::application::worklist::DEFAULT_WORKLIST_LIMIT;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "audit-portal.config.yml";

/// Brasília time, where the audit team works
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = -180;

pub const ENV_BACKEND_URL: &str = "AUDIT_PORTAL_URL";
pub const ENV_API_KEY: &str = "AUDIT_PORTAL_API_KEY";
pub const ENV_ACCESS_TOKEN: &str = "AUDIT_PORTAL_ACCESS_TOKEN";

/// Top-level configuration file schema.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
    pub incidents_table: Option<String>,
    pub evidence_bucket: Option<String>,
    pub chunk_size: Option<usize>,
    pub worklist_limit: Option<usize>,
    pub utc_offset_minutes: Option<i32>,
    pub collaborators_file: Option<PathBuf>,
    pub format: Option<String>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: HashMap<String, serde_yaml_ng::Value>,
}

impl ConfigFile {
    pub fn chunk_size(&self) -> usize {
        self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    pub fn worklist_limit(&self) -> usize {
        self.worklist_limit.unwrap_or(DEFAULT_WORKLIST_LIMIT)
    }

    /// Offset used to bucket audit timestamps into calendar days
    pub fn utc_offset(&self) -> Result<FixedOffset> {
        let minutes = self.utc_offset_minutes.unwrap_or(DEFAULT_UTC_OFFSET_MINUTES);
        FixedOffset::east_opt(minutes * 60).with_context(|| {
            format!(
                "Invalid config: utc_offset_minutes {} is out of range.\n\n💡 Hint: Use a value between -1439 and 1439 (e.g., -180 for UTC-3).",
                minutes
            )
        })
    }

    pub fn output_format(&self) -> Result<Option<OutputFormat>> {
        self.format
            .as_deref()
            .map(|f| f.parse::<OutputFormat>().map_err(anyhow::Error::msg))
            .transpose()
    }
}

/// Backend credentials taken from the environment; they win over the file.
#[derive(Debug, Default, Clone)]
pub struct EnvOverrides {
    pub backend_url: Option<String>,
    pub api_key: Option<String>,
    pub access_token: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        let read = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        Self {
            backend_url: read(ENV_BACKEND_URL),
            api_key: read(ENV_API_KEY),
            access_token: read(ENV_ACCESS_TOKEN),
        }
    }

    pub fn apply(self, mut config: ConfigFile) -> ConfigFile {
        if self.backend_url.is_some() {
            config.backend_url = self.backend_url;
        }
        if self.api_key.is_some() {
            config.api_key = self.api_key;
        }
        if self.access_token.is_some() {
            config.access_token = self.access_token;
        }
        config
    }
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Failed to read config file: {}\n\n💡 Hint: Check that the file exists and is readable.",
            path.display()
        )
    })?;

    let config: ConfigFile = serde_yaml_ng::from_str(&content).with_context(|| {
        format!(
            "Failed to parse config file: {}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
            path.display()
        )
    })?;

    warn_unknown_fields(&config);
    tracing::debug!(path = %path.display(), "config file loaded");

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    Ok(Some(config))
}

/// Explicit path, else discovery in `dir`, else defaults; then env overrides and validation.
pub fn resolve_config(explicit: Option<&Path>, dir: &Path, env: EnvOverrides) -> Result<ConfigFile> {
    let config = match explicit {
        Some(path) => load_config_from_path(path)?,
        None => discover_config(dir)?.unwrap_or_default(),
    };

    let config = env.apply(config);
    validate_config(&config)?;
    Ok(config)
}

/// Validate the loaded configuration.
pub fn validate_config(config: &ConfigFile) -> Result<()> {
    if config.chunk_size == Some(0) {
        bail!(
            "Invalid config: chunk_size must be greater than 0.\n\n\
             💡 Hint: Omit the key to use the default of {}.",
            DEFAULT_CHUNK_SIZE
        );
    }
    if config.worklist_limit == Some(0) {
        bail!(
            "Invalid config: worklist_limit must be greater than 0.\n\n\
             💡 Hint: Omit the key to use the default of {}.",
            DEFAULT_WORKLIST_LIMIT
        );
    }

    if let Some(url) = &config.backend_url {
        let parsed = reqwest::Url::parse(url).with_context(|| {
            format!(
                "Invalid config: backend_url '{}' is not a valid URL.\n\n\
                 💡 Hint: Use the full project URL (e.g., https://xyz.supabase.co).",
                url
            )
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            bail!(
                "Invalid config: backend_url '{}' must use http or https.",
                url
            );
        }
    }

    config.utc_offset()?;
    config.output_format()?;
    Ok(())
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        eprintln!(
            "⚠️  Warning: Unknown config field '{}' will be ignored.",
            key
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_config() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(
            &config_path,
            r#"
backend_url: https://portal.example.com
api_key: anon-key
incidents_table: incidents
evidence_bucket: photos
chunk_size: 50
worklist_limit: 200
utc_offset_minutes: 0
collaborators_file: team.toml
format: json
"#,
        )
        .unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.backend_url.as_deref(), Some("https://portal.example.com"));
        assert_eq!(config.api_key.as_deref(), Some("anon-key"));
        assert_eq!(config.incidents_table.as_deref(), Some("incidents"));
        assert_eq!(config.evidence_bucket.as_deref(), Some("photos"));
        assert_eq!(config.chunk_size(), 50);
        assert_eq!(config.worklist_limit(), 200);
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), 0);
        assert_eq!(config.collaborators_file, Some(PathBuf::from("team.toml")));
        assert_eq!(config.output_format().unwrap(), Some(OutputFormat::Json));
        assert!(config.access_token.is_none());
    }

    #[test]
    fn test_defaults() {
        let config = ConfigFile::default();
        assert_eq!(config.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(config.worklist_limit(), DEFAULT_WORKLIST_LIMIT);
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), -3 * 3600);
        assert!(config.output_format().unwrap().is_none());
        assert!(config.unknown_fields.is_empty());
    }

    #[test]
    fn test_discover_config_found() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILENAME), "format: markdown\n").unwrap();

        let config = discover_config(dir.path()).unwrap().unwrap();
        assert_eq!(config.format.as_deref(), Some("markdown"));
    }

    #[test]
    fn test_discover_config_not_found() {
        let dir = TempDir::new().unwrap();
        assert!(discover_config(dir.path()).unwrap().is_none());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config_from_path(Path::new("/nonexistent/config.yml"));
        let err = format!("{}", result.unwrap_err());
        assert!(err.contains("Failed to read config file"));
    }

    #[test]
    fn test_load_config_parse_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("bad.yml");
        fs::write(&config_path, "invalid: yaml: [[[broken").unwrap();

        let err = format!("{}", load_config_from_path(&config_path).unwrap_err());
        assert!(err.contains("Failed to parse config file"));
    }

    #[test]
    fn test_zero_chunk_size_is_rejected() {
        let config = ConfigFile {
            chunk_size: Some(0),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("chunk_size must be greater than 0"));
    }

    #[test]
    fn test_malformed_url_is_rejected() {
        for url in ["not a url", "ftp://portal.example.com"] {
            let config = ConfigFile {
                backend_url: Some(url.to_string()),
                ..Default::default()
            };
            assert!(validate_config(&config).is_err(), "{} should be rejected", url);
        }
    }

    #[test]
    fn test_out_of_range_offset_is_rejected() {
        let config = ConfigFile {
            utc_offset_minutes: Some(24 * 60),
            ..Default::default()
        };
        let err = validate_config(&config).unwrap_err().to_string();
        assert!(err.contains("utc_offset_minutes"));
    }

    #[test]
    fn test_invalid_format_is_rejected() {
        let config = ConfigFile {
            format: Some("pdf".to_string()),
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_env_overrides_win_over_file() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "backend_url: https://file.example.com\napi_key: file-key\n",
        )
        .unwrap();

        let env = EnvOverrides {
            backend_url: Some("https://env.example.com".to_string()),
            api_key: None,
            access_token: Some("token".to_string()),
        };
        let config = resolve_config(None, dir.path(), env).unwrap();

        assert_eq!(config.backend_url.as_deref(), Some("https://env.example.com"));
        assert_eq!(config.api_key.as_deref(), Some("file-key"));
        assert_eq!(config.access_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_resolve_validates_env_values() {
        let dir = TempDir::new().unwrap();
        let env = EnvOverrides {
            backend_url: Some("::nope::".to_string()),
            ..Default::default()
        };
        assert!(resolve_config(None, dir.path(), env).is_err());
    }

    #[test]
    fn test_unknown_fields_warning() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("config.yml");
        fs::write(&config_path, "format: json\nexclude_packages: [pip]\n").unwrap();

        let config = load_config_from_path(&config_path).unwrap();
        assert_eq!(config.unknown_fields.len(), 1);
        assert!(config.unknown_fields.contains_key("exclude_packages"));
    }
}
