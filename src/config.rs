use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

use crate::storage::DEFAULT_STORAGE_KEY;
use crate::utils::paths::get_config_path;

/// Which durable store the todos are written through to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Json,
    Sqlite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// Key the whole collection is stored under
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            key: default_storage_key(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub storage: StorageConfig,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            storage: StorageConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = get_config_path()?;

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Invalid config at {}", config_path.display()))?;

        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let config_path = get_config_path()?;

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(&config_path, content)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use tempfile::TempDir;

    fn setup_test_home() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        // SAFETY: every test touching HOME is #[serial], so no other thread
        // reads the environment concurrently.
        unsafe {
            env::set_var("HOME", temp_dir.path());
        }
        temp_dir
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.storage.backend, StorageBackend::Json);
        assert_eq!(config.storage.key, "allTodos");
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
        log_level = "debug"

        [storage]
        backend = "sqlite"
        key = "work"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.storage.backend, StorageBackend::Sqlite);
        assert_eq!(config.storage.key, "work");
    }

    #[test]
    fn test_config_uses_defaults_when_missing() {
        let toml_str = r#"
        [storage]
        backend = "sqlite"
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.storage.key, "allTodos");
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        let toml_str = r#"
        [storage]
        backend = "localstorage"
        "#;

        assert!(toml::from_str::<Config>(toml_str).is_err());
    }

    #[test]
    #[serial]
    fn test_load_without_file_gives_defaults() {
        let _home = setup_test_home();
        assert_eq!(Config::load().unwrap(), Config::default());
    }

    #[test]
    #[serial]
    fn test_save_then_load() {
        let _home = setup_test_home();
        let mut config = Config::default();
        config.storage.backend = StorageBackend::Sqlite;
        config.log_level = "warn".to_string();

        config.save().unwrap();
        assert!(get_config_path().unwrap().exists());
        assert_eq!(Config::load().unwrap(), config);
    }

    #[test]
    #[serial]
    fn test_load_reports_invalid_file() {
        let _home = setup_test_home();
        let path = get_config_path().unwrap();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "log_level = [").unwrap();

        assert!(Config::load().is_err());
    }
}
