//! Settings file for the typeahead host.
//!
//! A small JSON document tunes the controller defaults (search threshold,
//! rate limit, prompts). It lives at `<config_dir>/typeahead/settings.json`
//! unless `TYPEAHEAD_SETTINGS_PATH` points elsewhere. Every field is
//! optional; missing fields keep their defaults.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::paths::{app_config_path, expand_home};

/// Environment variable allowing callers to override the settings path.
pub const SETTINGS_PATH_ENV: &str = "TYPEAHEAD_SETTINGS_PATH";

/// Default filename for the JSON payload.
pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Error surfaced when reading settings fails.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// I/O failure other than a missing file.
    #[error("settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Values read from the settings file.
///
/// `min_search_chars` is kept signed so that a negative value in the file is
/// accepted and clamped by the consumer instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeaheadSettings {
    pub min_search_chars: i64,
    pub throttle_delay_ms: u64,
    pub placeholder: String,
    pub new_item_prompt: String,
    pub allow_create: bool,
}

impl Default for TypeaheadSettings {
    fn default() -> Self {
        Self {
            min_search_chars: 3,
            throttle_delay_ms: 750,
            placeholder: "Type and select".to_string(),
            new_item_prompt: "Create".to_string(),
            allow_create: false,
        }
    }
}

impl TypeaheadSettings {
    /// Load from the default location (see [`default_settings_path`]).
    pub fn load() -> Result<Self, SettingsError> {
        Self::load_from(&default_settings_path())
    }

    /// Load from `path`. A missing file yields defaults; a malformed file is
    /// reported through `tracing` and also yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, SettingsError> {
        match fs::read_to_string(path) {
            Ok(data) => match serde_json::from_str(&data) {
                Ok(settings) => Ok(settings),
                Err(error) => {
                    warn!(
                        path = %path.display(),
                        error = %error,
                        "Failed to parse settings file; using defaults"
                    );
                    Ok(Self::default())
                }
            },
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(SettingsError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }
}

/// Resolve the settings path, honouring [`SETTINGS_PATH_ENV`].
pub fn default_settings_path() -> PathBuf {
    if let Ok(path) = env::var(SETTINGS_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_home(&path);
    }
    app_config_path(SETTINGS_FILE_NAME)
}
