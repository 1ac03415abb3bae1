//! User settings: defaults, the on-disk settings file, and command-line
//! overrides layered on top.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::keymap::{DEFAULT_DOWN_KEYS, DEFAULT_UP_KEYS};

pub const CONFIG_DIR: &str = ".geek-life";
pub const CONFIG_FILE: &str = "config.json";
pub const DEFAULT_DB_FILE: &str = "~/.geek-life/default.db";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    NoHomeDir,
    #[error("settings io error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid settings file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    #[serde(rename = "db-file")]
    pub db_file: String,
    pub vertical: bool,
    pub dynamic: bool,
    #[serde(rename = "upKeys")]
    pub up_keys: Vec<String>,
    #[serde(rename = "downKeys")]
    pub down_keys: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            db_file: DEFAULT_DB_FILE.to_string(),
            vertical: false,
            dynamic: false,
            up_keys: DEFAULT_UP_KEYS.iter().map(|s| s.to_string()).collect(),
            down_keys: DEFAULT_DOWN_KEYS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Values given on the command line. Boolean flags only override the file
/// when they were actually passed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub db_file: Option<String>,
    pub vertical: bool,
    pub dynamic: bool,
}

impl Settings {
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(db_file) = overrides.db_file.as_ref().filter(|p| !p.trim().is_empty()) {
            self.db_file = db_file.clone();
        }
        if overrides.vertical {
            self.vertical = true;
        }
        if overrides.dynamic {
            self.dynamic = true;
        }
        self
    }

    /// Database location with a leading `~` expanded against `home`.
    pub fn db_path(&self, home: Option<&Path>) -> PathBuf {
        expand_tilde(&self.db_file, home)
    }
}

pub fn expand_tilde(raw: &str, home: Option<&Path>) -> PathBuf {
    match (raw.strip_prefix('~'), home) {
        (Some(""), Some(home)) => home.to_path_buf(),
        (Some(rest), Some(home)) if rest.starts_with('/') || rest.starts_with('\\') => {
            home.join(&rest[1..])
        }
        _ => PathBuf::from(raw),
    }
}

pub fn home_dir() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn config_dir(home: &Path) -> PathBuf {
    home.join(CONFIG_DIR)
}

pub fn settings_path(home: &Path) -> PathBuf {
    config_dir(home).join(CONFIG_FILE)
}

/// Reads the settings file. A missing file is not an error.
pub fn load_from(path: &Path) -> Result<Option<Settings>, ConfigError> {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&data)
        .map(Some)
        .map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
}

/// Writes `settings` to `path` unless a file is already there.
/// Returns whether a file was written.
pub fn ensure_file(path: &Path, settings: &Settings) -> Result<bool, ConfigError> {
    if path.exists() {
        return Ok(false);
    }
    let io_err = |source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(io_err)?;
    }
    let content = serde_json::to_string_pretty(settings).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, content).map_err(io_err)?;
    Ok(true)
}

/// Full start-up pipeline: defaults, then the settings file under `home`,
/// then `overrides`. Problems with the file are logged and never abort.
pub fn load(home: Option<&Path>, overrides: &Overrides) -> Settings {
    let Some(home) = home else {
        tracing::warn!(error = %ConfigError::NoHomeDir, "using default settings");
        return Settings::default().with_overrides(overrides);
    };

    let path = settings_path(home);
    let base = match load_from(&path) {
        Ok(Some(settings)) => settings,
        Ok(None) => {
            let defaults = Settings::default();
            match ensure_file(&path, &defaults) {
                Ok(true) => tracing::info!(path = %path.display(), "wrote default settings"),
                Ok(false) => {}
                Err(err) => tracing::warn!(error = %err, "could not save default settings"),
            }
            defaults
        }
        Err(err) => {
            tracing::warn!(error = %err, "ignoring settings file");
            Settings::default()
        }
    };

    base.with_overrides(overrides)
}

#[cfg(test)]
#[path = "../../tests/unit/config.rs"]
mod tests;
