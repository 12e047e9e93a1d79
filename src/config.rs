use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::history::DEFAULT_CAPACITY;
use crate::programmer::WordSize;
use crate::session::Mode;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Start-up settings of a calculator session. Every field is optional in
/// the TOML source
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SessionConfig {
    pub mode: Mode,
    pub word_size: WordSize,
    pub signed: bool,
    pub history_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            mode: Mode::Standard,
            word_size: WordSize::QWord,
            signed: true,
            history_capacity: DEFAULT_CAPACITY,
        }
    }
}

impl SessionConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }
}
