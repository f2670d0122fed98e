//! Labeling configuration, loaded from TOML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{LabelkitError, Result};
use crate::schema::{labels, point, timestamp};

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelingConfig {
    /// Directory scanned for trajectory files
    pub data_dir: PathBuf,
    /// Extension of trajectory files (without the dot)
    pub file_extension: String,
    /// Number of rows in the default selection window
    pub default_window: usize,
    /// chrono formats tried after RFC 3339
    pub timestamp_formats: Vec<String>,
    /// Options offered to the analyst, in display order
    pub label_options: Vec<String>,
    /// CSV header names
    pub columns: ColumnConfig,
}

/// Header names of the trajectory CSV.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnConfig {
    pub vessel_key: String,
    pub timestamp: String,
    pub latitude: String,
    pub longitude: String,
    pub speed_over_ground: String,
    pub heading: String,
    pub label: String,
}

impl Default for LabelingConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            file_extension: "csv".to_string(),
            default_window: 1000,
            timestamp_formats: timestamp::FORMATS.iter().map(|f| f.to_string()).collect(),
            label_options: labels::DEFAULT_OPTIONS
                .iter()
                .map(|l| l.to_string())
                .collect(),
            columns: ColumnConfig::default(),
        }
    }
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            vessel_key: point::VESSEL_KEY.to_string(),
            timestamp: point::TIMESTAMP.to_string(),
            latitude: point::LATITUDE.to_string(),
            longitude: point::LONGITUDE.to_string(),
            speed_over_ground: point::SPEED_OVER_GROUND.to_string(),
            heading: point::HEADING.to_string(),
            label: point::LABEL.to_string(),
        }
    }
}

impl ColumnConfig {
    /// Columns that must be present in every source file.
    pub fn required(&self) -> [&str; 6] {
        [
            self.vessel_key.as_str(),
            self.timestamp.as_str(),
            self.latitude.as_str(),
            self.longitude.as_str(),
            self.speed_over_ground.as_str(),
            self.heading.as_str(),
        ]
    }

    fn all(&self) -> [&str; 7] {
        let [a, b, c, d, e, f] = self.required();
        [a, b, c, d, e, f, self.label.as_str()]
    }
}

impl LabelingConfig {
    /// Validate config values.
    /// Returns Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.default_window == 0 {
            return Err(LabelkitError::Config(
                "default_window must be > 0".to_string(),
            ));
        }
        if self.file_extension.trim().is_empty() {
            return Err(LabelkitError::Config(
                "file_extension must not be empty".to_string(),
            ));
        }
        let headers = self.columns.all();
        for (i, name) in headers.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(LabelkitError::Config(format!(
                    "column name #{} must not be empty",
                    i
                )));
            }
            if headers[..i].contains(name) {
                return Err(LabelkitError::Config(format!(
                    "column '{}' is mapped more than once",
                    name
                )));
            }
        }
        if self.label_options.iter().any(|o| o.trim().is_empty()) {
            return Err(LabelkitError::Config(
                "label_options must not contain empty entries".to_string(),
            ));
        }
        Ok(())
    }

    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| LabelkitError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` when it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| LabelkitError::Config(e.to_string()))
    }
}
