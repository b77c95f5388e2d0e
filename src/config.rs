use crate::types::chart_style::ChartStyle;
use crate::utils::default_config_path;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse config file '{0}'")]
    Parse(PathBuf, #[source] serde_json::Error),

    #[error("Delimiter '{0}' must be a single ASCII character")]
    InvalidDelimiter(char),
}

/// User settings, read from a JSON file. Every key is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub delimiter: char,
    pub chart_style: ChartStyle,
    pub output_dir: PathBuf,
    pub top_n: usize,
    pub rain_threshold_mm: f64,
    pub hot_day_threshold_c: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            delimiter: ',',
            chart_style: ChartStyle::default(),
            output_dir: PathBuf::from("charts"),
            top_n: 5,
            rain_threshold_mm: 10.0,
            hot_day_threshold_c: 30.0,
        }
    }
}

impl Config {
    /// Reads the config at `path`, or at the default location when `None`.
    ///
    /// A missing file yields the defaults. An explicitly given path that does
    /// not exist is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, explicit) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match default_config_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        if !explicit && !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let text = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read(path.clone(), e))?;
        let config: Config =
            serde_json::from_str(&text).map_err(|e| ConfigError::Parse(path.clone(), e))?;
        config.delimiter_byte()?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// The delimiter as the byte expected by the CSV reader and writer.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        delimiter_byte(self.delimiter)
    }
}

pub fn delimiter_byte(delimiter: char) -> Result<u8, ConfigError> {
    if delimiter.is_ascii() {
        Ok(delimiter as u8)
    } else {
        Err(ConfigError::InvalidDelimiter(delimiter))
    }
}
