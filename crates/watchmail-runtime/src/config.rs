//! Persisted defaults, merged under explicit command-line flags.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Operator defaults kept in a TOML file. Every field is optional; a missing
/// file means an empty config.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub default_to: Option<String>,
    #[serde(default)]
    pub default_from: Option<String>,
    #[serde(default)]
    pub default_cooldown: Option<String>,
    #[serde(default)]
    pub default_interval: Option<f64>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::default_path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve the config file path based on priority:
    /// 1. WATCHMAIL_CONFIG environment variable
    /// 2. XDG config directory
    /// 3. ~/.watchmail (fallback for systems without XDG)
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var("WATCHMAIL_CONFIG") {
            return Ok(PathBuf::from(path));
        }

        if let Some(config_dir) = dirs::config_dir() {
            return Ok(config_dir.join("watchmail").join("config.toml"));
        }

        if let Some(home) = std::env::var_os("HOME") {
            return Ok(PathBuf::from(home).join(".watchmail").join("config.toml"));
        }

        bail!("Could not determine config path: no HOME or XDG config directory found")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_default_is_empty() {
        let config = Config::default();
        assert!(config.api_key.is_none());
        assert!(config.default_to.is_none());
        assert!(config.default_interval.is_none());
    }

    #[test]
    fn test_config_save_and_load() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let config = Config {
            api_key: Some("re_test_key".to_string()),
            default_to: Some("ops@example.com".to_string()),
            default_from: Some("watch@example.com".to_string()),
            default_cooldown: Some("5m".to_string()),
            default_interval: Some(10.0),
        };

        config.save_to(&config_path)?;
        assert!(config_path.exists());

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.api_key.as_deref(), Some("re_test_key"));
        assert_eq!(loaded.default_to.as_deref(), Some("ops@example.com"));
        assert_eq!(loaded.default_cooldown.as_deref(), Some("5m"));
        assert_eq!(loaded.default_interval, Some(10.0));

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_returns_default() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config = Config::load_from(&temp_dir.path().join("nonexistent.toml"))?;
        assert!(config.api_key.is_none());
        Ok(())
    }

    #[test]
    fn test_partial_file_fills_missing_fields_with_none() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "default_to = \"ops@example.com\"\n")?;

        let loaded = Config::load_from(&config_path)?;
        assert_eq!(loaded.default_to.as_deref(), Some("ops@example.com"));
        assert!(loaded.api_key.is_none());
        Ok(())
    }

    #[test]
    fn test_malformed_file_is_an_error() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");
        std::fs::write(&config_path, "not valid toml [[[")?;

        assert!(Config::load_from(&config_path).is_err());
        Ok(())
    }
}
