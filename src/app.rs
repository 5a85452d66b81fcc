use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::api::{ApiError, HttpContactApi};

/// Environment variable that overrides the configured API base URL.
pub const API_BASE_ENV: &str = "CONTACTS_API_BASE";
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not write config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Where the contact API lives; `/api/contacts` is appended.
    pub api_base_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self { api_base_url: DEFAULT_API_BASE.to_string() }
    }
}

impl AppConfig {
    fn config_path() -> Option<PathBuf> {
        let proj = crate::storage::project_dirs()?;
        Some(proj.config_dir().join("config.toml"))
    }

    /// Config file, then environment. A missing file is written out with
    /// defaults so there is something to edit; a broken one is ignored.
    pub fn load() -> Self {
        let file = match Self::config_path() {
            Some(path) => match Self::load_from(&path) {
                Ok(Some(config)) => config,
                Ok(None) => {
                    let config = Self::default();
                    if let Err(e) = config.save_to(&path) {
                        log::warn!("could not write default config to {}: {e}", path.display());
                    }
                    config
                }
                Err(e) => {
                    log::warn!("ignoring {}: {e}", path.display());
                    Self::default()
                }
            },
            None => Self::default(),
        };
        file.with_env_override(std::env::var(API_BASE_ENV).ok())
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        match fs::read_to_string(path) {
            Ok(text) => Ok(Some(toml::from_str(&text)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    fn with_env_override(mut self, value: Option<String>) -> Self {
        if let Some(url) = value.filter(|v| !v.trim().is_empty()) {
            log::info!("using API base from {API_BASE_ENV}");
            self.api_base_url = url;
        }
        self
    }

    pub fn api_client(&self) -> Result<HttpContactApi, ApiError> {
        HttpContactApi::new(&self.api_base_url)
    }
}

#[cfg(feature = "gui")]
pub fn build_ui(app: &adw::Application) {
    use crate::prefs::PreferenceContext;
    use crate::storage::TomlFileStore;

    let config = AppConfig::load();
    let api = match config.api_client() {
        Ok(api) => api,
        Err(e) => {
            log::error!("{e}; falling back to {DEFAULT_API_BASE}");
            match HttpContactApi::new(DEFAULT_API_BASE) {
                Ok(api) => api,
                Err(e) => {
                    log::error!("cannot build API client: {e}");
                    return;
                }
            }
        }
    };
    log::info!("contact API at {}", config.api_base_url);
    let prefs = PreferenceContext::load(TomlFileStore::default_location());
    crate::ui::main_window::show_main_window(app, api, prefs);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(AppConfig::load_from(&dir.path().join("config.toml")).unwrap().is_none());
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sub").join("config.toml");
        let config = AppConfig { api_base_url: "http://crm.internal:9000".into() };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), Some(config));
    }

    #[test]
    fn unknown_and_missing_keys_use_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "theme = \"dark\"\n").unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), Some(AppConfig::default()));

        fs::write(&path, "api_base_url = 3").unwrap();
        assert!(matches!(AppConfig::load_from(&path), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn env_override_wins_unless_blank() {
        let config = AppConfig::default().with_env_override(Some("http://other".into()));
        assert_eq!(config.api_base_url, "http://other");
        let config = AppConfig::default().with_env_override(Some("  ".into()));
        assert_eq!(config.api_base_url, DEFAULT_API_BASE);
        assert!(AppConfig::default().api_client().is_ok());
    }
}
