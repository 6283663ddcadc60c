//! Configuration management for Sow Brand tools
//!
//! Config stored at: ~/.config/sow-tools/config.json

use serde::{Deserialize, Serialize};
use sow_domain::model::CompanyInfo;
use sow_infra::persistence::RemoteSettings;
use sow_types::{ConfigError, OutputFormat, Result, StorageBackend};
use std::path::PathBuf;

use crate::constants::print::PRINT_DIR_NAME;
use crate::constants::storage::{
    APP_DIR_NAME, CONFIG_FILE_NAME, DEFAULT_REMOTE_TABLE, DEFAULT_REMOTE_TIMEOUT_SECS,
    REMOTE_KEY_ENV, REMOTE_URL_ENV,
};

/// Remote document library connection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteConfig {
    /// Project URL (overridden by `SOW_REMOTE_URL`)
    #[serde(default)]
    pub url: String,

    /// Anonymous API key (overridden by `SOW_REMOTE_KEY`)
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_table")]
    pub table: String,

    /// HTTP request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_table() -> String {
    DEFAULT_REMOTE_TABLE.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_REMOTE_TIMEOUT_SECS
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            api_key: String::new(),
            table: default_table(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    /// Settings with environment overrides applied
    pub fn settings(&self) -> RemoteSettings {
        self.settings_with(|name| std::env::var(name).ok())
    }

    fn settings_with(&self, env: impl Fn(&str) -> Option<String>) -> RemoteSettings {
        let pick = |name: &str, configured: &str| {
            env(name)
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| configured.to_string())
        };
        RemoteSettings {
            url: pick(REMOTE_URL_ENV, &self.url),
            api_key: pick(REMOTE_KEY_ENV, &self.api_key),
            table: self.table.clone(),
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Document library backend (local, remote)
    #[serde(default)]
    pub backend: StorageBackend,

    #[serde(default)]
    pub remote: RemoteConfig,

    /// Draft and local library directory override
    #[serde(default)]
    pub store_dir: Option<PathBuf>,

    /// Directory for generated print files
    #[serde(default)]
    pub print_dir: Option<PathBuf>,

    /// Letterhead on printed documents
    #[serde(default)]
    pub company: CompanyInfo,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            remote: RemoteConfig::default(),
            store_dir: None,
            print_dir: None,
            company: CompanyInfo::default(),
            output_format: default_output_format(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR_NAME);
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join(CONFIG_FILE_NAME))
    }

    /// Directory holding drafts.json and documents.json
    pub fn store_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.store_dir {
            return Ok(dir.clone());
        }

        let store_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join(APP_DIR_NAME);
        Ok(store_dir)
    }

    /// Directory for generated print files
    pub fn print_dir(&self) -> PathBuf {
        self.print_dir
            .clone()
            .unwrap_or_else(|| std::env::temp_dir().join(PRINT_DIR_NAME))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }
}

fn mask_key(key: &str) -> String {
    if key.is_empty() {
        return "(not set)".to_string();
    }
    let visible: String = key.chars().take(6).collect();
    format!("{}…", visible)
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let remote = self.remote.settings();

        writeln!(f, "Sow Brand Tools Configuration")?;
        writeln!(f, "=============================")?;
        writeln!(f)?;
        writeln!(f, "Backend:        {}", self.backend)?;
        writeln!(
            f,
            "Remote URL:     {}",
            if remote.url.is_empty() { "(not set)" } else { remote.url.as_str() }
        )?;
        writeln!(f, "Remote key:     {}", mask_key(&remote.api_key))?;
        writeln!(f, "Remote table:   {}", remote.table)?;
        writeln!(f, "Timeout:        {}s", remote.timeout_secs)?;
        writeln!(
            f,
            "Store dir:      {}",
            self.store_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Print dir:      {}", self.print_dir().display())?;
        writeln!(f, "Company:        {} ({})", self.company.name, self.company.cnpj)?;
        writeln!(f, "Output format:  {}", self.output_format)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"backend": "remote", "remote": {"url": "https://x.supabase.co"}}"#).unwrap();
        assert_eq!(config.backend, StorageBackend::Remote);
        assert_eq!(config.remote.table, "documents");
        assert_eq!(config.remote.timeout_secs, 30);
        assert_eq!(config.output_format, OutputFormat::Table);
        assert_eq!(config.company.name, "Sow Brand");
    }

    #[test]
    fn test_env_overrides_remote() {
        let remote = RemoteConfig {
            url: "https://config.example".into(),
            api_key: "from-config".into(),
            ..RemoteConfig::default()
        };
        let settings = remote.settings_with(|name| match name {
            REMOTE_KEY_ENV => Some("from-env".to_string()),
            REMOTE_URL_ENV => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(settings.api_key, "from-env");
        assert_eq!(settings.url, "https://config.example");
    }

    #[test]
    fn test_explicit_dirs() {
        let config = Config {
            store_dir: Some(PathBuf::from("/tmp/sow-store")),
            print_dir: Some(PathBuf::from("/tmp/sow-print")),
            ..Config::default()
        };
        assert_eq!(config.store_dir().unwrap(), PathBuf::from("/tmp/sow-store"));
        assert_eq!(config.print_dir(), PathBuf::from("/tmp/sow-print"));
    }

    #[test]
    fn test_key_is_masked() {
        assert_eq!(mask_key(""), "(not set)");
        assert_eq!(mask_key("eyJhbGciOiJIUzI1"), "eyJhbG…");
    }
}
