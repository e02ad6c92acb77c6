//! # Configuration
//!
//! User settings live in `config.json` next to the inventory in the data directory.
//! A missing file means defaults; unknown keys in the file are ignored.
//!
//! | Key | Default | Description |
//! |-----|---------|-------------|
//! | `export-dir` | `.` | Directory CSV exports are written to |
//! | `date-format` | `%d/%m/%Y` | How expiry dates are shown in listings |

use crate::error::{Result, StockError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATE_FORMAT: &str = "%d/%m/%Y";

pub const CONFIG_KEYS: [&str; 2] = ["export-dir", "date-format"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StockConfig {
    /// Where `export` writes files
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,

    /// strftime-style format for expiry dates in listings
    #[serde(default = "default_date_format")]
    pub date_format: String,
}

fn default_export_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_date_format() -> String {
    DEFAULT_DATE_FORMAT.to_string()
}

impl Default for StockConfig {
    fn default() -> Self {
        Self {
            export_dir: default_export_dir(),
            date_format: default_date_format(),
        }
    }
}

impl StockConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path).map_err(StockError::Io)?;
        let mut config: StockConfig =
            serde_json::from_str(&content).map_err(StockError::Serialization)?;

        if let Err(reason) = validate_date_format(&config.date_format) {
            tracing::warn!(%reason, "ignoring date-format from config file");
            config.date_format = default_date_format();
        }
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).map_err(StockError::Io)?;
        }

        let config_path = config_dir.join(CONFIG_FILENAME);
        let content = serde_json::to_string_pretty(self).map_err(StockError::Serialization)?;
        fs::write(config_path, content).map_err(StockError::Io)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "export-dir" => Some(self.export_dir.display().to_string()),
            "date-format" => Some(self.date_format.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "export-dir" => {
                if value.trim().is_empty() {
                    return Err("export-dir cannot be empty".to_string());
                }
                self.export_dir = PathBuf::from(value);
                Ok(())
            }
            "date-format" => {
                validate_date_format(value)?;
                self.date_format = value.to_string();
                Ok(())
            }
            _ => Err(format!("Unknown config key: {}", key)),
        }
    }
}

/// A format is usable when it renders a plain calendar date. Time-of-day and
/// timezone specifiers parse fine but fail at render time, so they are rejected too.
fn validate_date_format(format: &str) -> std::result::Result<(), String> {
    use chrono::format::{Item, StrftimeItems};
    use std::fmt::Write;

    if format.trim().is_empty() {
        return Err("date-format cannot be empty".to_string());
    }
    let invalid = || format!("Invalid date format: {}", format);
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return Err(invalid());
    }

    let sample = NaiveDate::from_ymd_opt(2025, 1, 31).ok_or_else(invalid)?;
    let mut rendered = String::new();
    write!(rendered, "{}", sample.format(format)).map_err(|_| invalid())?;
    Ok(())
}
