use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no writable preference location available")]
    Unavailable,

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed preferences file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Durable string key-value store for user preferences.
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

pub(crate) fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "example", "ContactsGtk")
}

fn ensure_dir(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}

/// Flat TOML table on disk. The whole file is rewritten on every `set`.
pub struct TomlFileStore {
    path: Option<PathBuf>,
}

impl TomlFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    /// `preferences.toml` in the platform config directory, if there is one.
    pub fn default_location() -> Self {
        let path = project_dirs().map(|p| p.config_dir().join("preferences.toml"));
        if path.is_none() {
            log::warn!("no config directory found; preferences will not persist");
        }
        Self { path }
    }

    fn path(&self) -> Result<&Path, StoreError> {
        self.path.as_deref().ok_or(StoreError::Unavailable)
    }

    fn read_table(&self) -> Result<BTreeMap<String, String>, StoreError> {
        let path = self.path()?;
        match fs::read_to_string(path) {
            Ok(text) => Ok(toml::from_str(&text)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }
}

impl PreferenceStore for TomlFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read_table()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        // A corrupt file is replaced rather than blocking the write.
        let mut table = match self.read_table() {
            Err(StoreError::Parse(e)) => {
                log::warn!("discarding malformed preferences file: {e}");
                BTreeMap::new()
            }
            other => other?,
        };
        table.insert(key.to_string(), value.to_string());
        let path = self.path()?;
        ensure_dir(path)?;
        fs::write(path, toml::to_string_pretty(&table)?)?;
        Ok(())
    }
}

/// In-process store; nothing survives the process.
#[derive(Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().insert(key.to_string(), value.to_string());
        Ok(())
    }
}
