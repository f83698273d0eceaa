use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use winit::event::MouseButton;

use crate::bindings::KeyBindings;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameSettings {
    pub always_show_status_bars: bool,
    pub use_classic_mouse_style: bool,
}

impl GameSettings {
    /// Button that confirms a targeted order such as attack-move.
    pub fn mouse_button_action(&self) -> MouseButton {
        if self.use_classic_mouse_style {
            MouseButton::Left
        } else {
            MouseButton::Right
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub keys: KeyBindings,
    pub game: GameSettings,
}

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings in {path} at '{field}': {source}")]
    Parse {
        path: PathBuf,
        field: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to encode settings: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to write settings file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Persistence for player settings.
pub trait SettingsStore {
    fn load(&self) -> Result<Settings, SettingsError>;
    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError>;
}

#[derive(Debug, Clone)]
pub struct JsonSettingsFile {
    path: PathBuf,
}

impl JsonSettingsFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SettingsStore for JsonSettingsFile {
    /// A missing file yields defaults.
    fn load(&self) -> Result<Settings, SettingsError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "settings_missing_using_defaults");
                return Ok(Settings::default());
            }
            Err(source) => {
                return Err(SettingsError::Read {
                    path: self.path.clone(),
                    source,
                })
            }
        };

        let mut deserializer = serde_json::Deserializer::from_str(&raw);
        serde_path_to_error::deserialize(&mut deserializer).map_err(|error| {
            let field = error.path().to_string();
            SettingsError::Parse {
                path: self.path.clone(),
                field,
                source: error.into_inner(),
            }
        })
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        let text = serde_json::to_string_pretty(settings).map_err(SettingsError::Encode)?;
        write_replacing(&self.path, text.as_bytes()).map_err(|source| SettingsError::Write {
            path: self.path.clone(),
            source,
        })?;
        info!(path = %self.path.display(), "settings_saved");
        Ok(())
    }
}

/// Writes to a sibling temp file, then renames it over `path`.
fn write_replacing(path: &Path, bytes: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("settings.json");
    let tmp_path = path.with_file_name(format!("{file_name}.tmp"));
    fs::write(&tmp_path, bytes)?;

    if let Err(error) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(error);
    }
    Ok(())
}

/// Keeps the last saved settings in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySettingsStore {
    saved: Option<Settings>,
    save_count: u32,
}

impl MemorySettingsStore {
    pub fn saved(&self) -> Option<&Settings> {
        self.saved.as_ref()
    }

    pub fn save_count(&self) -> u32 {
        self.save_count
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<Settings, SettingsError> {
        Ok(self.saved.clone().unwrap_or_default())
    }

    fn save(&mut self, settings: &Settings) -> Result<(), SettingsError> {
        self.saved = Some(settings.clone());
        self.save_count = self.save_count.saturating_add(1);
        Ok(())
    }
}
