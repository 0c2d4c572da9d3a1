//! Program settings, read from `settings.toml` in the urbs2 config folder.
//!
//! The file is optional. Settings missing from it take their default values.
use crate::get_urbs2_config_dir;
use crate::input::read_toml;
use crate::log::{DEFAULT_LOG_LEVEL, parse_log_level};
use anyhow::{Context, Result};
use documented::DocumentedFields;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};

const SETTINGS_FILE_NAME: &str = "settings.toml";

/// Program settings
#[derive(Debug, DocumentedFields, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Log level used unless `URBS2_LOG_LEVEL` is set (off, error, warn, info, debug or trace)
    pub log_level: String,
    /// Whether `build` may replace the contents of an existing output folder
    pub overwrite: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            overwrite: false,
        }
    }
}

impl Settings {
    /// Path of the settings file in the urbs2 config folder
    pub fn file_path() -> PathBuf {
        get_urbs2_config_dir().join(SETTINGS_FILE_NAME)
    }

    /// Load the settings from the urbs2 config folder
    pub fn load() -> Result<Self> {
        Self::load_from_dir(&get_urbs2_config_dir())
    }

    /// Load the settings file in `config_dir`, falling back to defaults if there isn't one
    fn load_from_dir(config_dir: &Path) -> Result<Self> {
        let file_path = config_dir.join(SETTINGS_FILE_NAME);
        if !file_path.is_file() {
            return Ok(Self::default());
        }

        let settings: Self = read_toml(&file_path)?;
        parse_log_level(&settings.log_level)
            .with_context(|| format!("Invalid log_level in {}", file_path.display()))?;

        Ok(settings)
    }

    /// A settings file template, with every setting commented out and set to its default value
    pub fn template() -> Result<String> {
        let defaults = toml::to_string(&Self::default())?;

        let mut out = String::from("# urbs2 settings. Uncomment a line to change a setting.\n");
        for line in defaults.lines() {
            let Some((field, _)) = line.split_once('=') else {
                continue;
            };
            let doc = Self::get_field_docs(field.trim()).unwrap_or_default();
            write!(out, "\n# {doc}\n# {line}\n")?;
        }

        Ok(out)
    }
}
