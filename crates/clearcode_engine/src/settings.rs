//! Persisted toggle state.

use std::cell::RefCell;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clearcode_core::Settings;
use clearcode_logging::clear_debug;
use thiserror::Error;

use crate::persist::{write_atomically, PersistError};

pub const SETTINGS_FILENAME: &str = ".clearcode_settings.ron";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings from {path}: {message}")]
    Parse { path: String, message: String },
    #[error("failed to serialize settings: {0}")]
    Serialize(String),
    #[error("unknown setting {0:?}")]
    UnknownKey(String),
    #[error(transparent)]
    Persist(#[from] PersistError),
}

pub trait SettingsStore {
    fn load(&self) -> Result<Settings, SettingsError>;
    fn save(&self, settings: &Settings) -> Result<(), SettingsError>;

    /// Unset or unknown-to-the-file keys read as `false`.
    fn get_setting(&self, key: &str) -> Result<bool, SettingsError> {
        Ok(self.load()?.get(key).unwrap_or(false))
    }

    fn set_setting(&self, key: &str, value: bool) -> Result<(), SettingsError> {
        let mut settings = self.load()?;
        if !settings.set(key, value) {
            return Err(SettingsError::UnknownKey(key.to_string()));
        }
        self.save(&settings)
    }
}

/// Settings kept in a RON file. A missing file means defaults.
#[derive(Debug, Clone)]
pub struct RonSettingsStore {
    path: PathBuf,
}

impl RonSettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the conventional file name inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(SETTINGS_FILENAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for RonSettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                clear_debug!("no settings at {:?}, using defaults", self.path);
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.display().to_string(),
                    source,
                })
            }
        };
        ron::from_str(&text).map_err(|err| SettingsError::Parse {
            path: self.path.display().to_string(),
            message: err.to_string(),
        })
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        let pretty = ron::ser::PrettyConfig::new();
        let content = ron::ser::to_string_pretty(settings, pretty)
            .map_err(|err| SettingsError::Serialize(err.to_string()))?;
        write_atomically(&self.path, &content)?;
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: RefCell<Settings>,
}

impl MemorySettingsStore {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings: RefCell::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        Ok(*self.settings.borrow())
    }

    fn save(&self, settings: &Settings) -> Result<(), SettingsError> {
        *self.settings.borrow_mut() = *settings;
        Ok(())
    }
}
