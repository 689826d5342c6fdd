//! User configuration
//!
//! Optional TOML file providing defaults for the command-line flags:
//!
//! ```toml
//! format = "xlsx"     # csv | xlsx
//! media = true        # extract media next to the export
//! delimiter = ";"     # CSV field delimiter
//! color = false       # colored terminal output
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};
use crate::export::ExportFormat;

const APP_DIR_NAME: &str = "apkg-convert";
const CONFIG_FILE_NAME: &str = "config.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub format: Option<ExportFormat>,
    pub media: bool,
    pub delimiter: Option<char>,
    pub color: Option<bool>,
}

impl Config {
    /// `<config dir>/apkg-convert/config.toml`, where the platform has one
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        if let Some(delimiter) = config.delimiter {
            parse_delimiter(delimiter)?;
        }
        log::debug!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Load an explicitly named file, or the default file if it exists.
    ///
    /// An explicit path that cannot be read is an error; a missing default
    /// file just means defaults.
    pub fn load_or_default(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// CSV delimiter byte, `,` unless configured
    pub fn delimiter_byte(&self) -> Result<u8> {
        self.delimiter.map(parse_delimiter).unwrap_or(Ok(b','))
    }
}

/// Validate a CSV delimiter: one ASCII character that is not a quote or line break.
pub fn parse_delimiter(c: char) -> Result<u8> {
    if !c.is_ascii() || matches!(c, '"' | '\n' | '\r') {
        return Err(ConvertError::InvalidOption(format!(
            "delimiter must be a single ASCII character other than a quote or line break, got {:?}",
            c
        )));
    }
    Ok(c as u8)
}
