// Run configuration: optional TOML file, overridden by CLI flags

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};
use crate::constants::{
    DEFAULT_CLIP_SKEW_MINUTES, DEFAULT_DIVE_LABEL_COLUMN, DEFAULT_DIVE_LOG_DELIMITER,
    DEFAULT_EXCLUDED_EXTENSIONS, DEFAULT_LAUNCH_COLUMN, DEFAULT_METADATA_FILENAME,
    DEFAULT_RECOVERY_COLUMN,
};
use crate::error::{RenamerError, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Recorder root (e.g. `D:/axis-0e35ff78e`). Files are flattened into it.
    #[serde(default)]
    pub root: PathBuf,
    /// Prefix for dive-tagged file names.
    #[serde(default)]
    pub project_name: Option<String>,
    #[serde(default = "default_metadata_filename")]
    pub metadata_filename: String,
    #[serde(default = "default_excluded_extensions")]
    pub excluded_extensions: Vec<String>,
    /// Subtracted from each dive's launch time to absorb clip segmentation.
    #[serde(default = "default_clip_skew_minutes")]
    pub clip_skew_minutes: i64,
    #[serde(default)]
    pub dive_log: Option<DiveLogConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiveLogConfig {
    pub path: PathBuf,
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    #[serde(default)]
    pub columns: DiveLogColumns,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiveLogColumns {
    #[serde(default = "default_label_column")]
    pub label: String,
    #[serde(default = "default_launch_column")]
    pub launch: String,
    #[serde(default = "default_recovery_column")]
    pub recovery: String,
}

impl Default for DiveLogColumns {
    fn default() -> Self {
        Self {
            label: default_label_column(),
            launch: default_launch_column(),
            recovery: default_recovery_column(),
        }
    }
}

impl DiveLogConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: default_delimiter(),
            columns: DiveLogColumns::default(),
        }
    }
}

fn default_metadata_filename() -> String {
    DEFAULT_METADATA_FILENAME.to_string()
}
fn default_excluded_extensions() -> Vec<String> {
    DEFAULT_EXCLUDED_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}
fn default_clip_skew_minutes() -> i64 {
    DEFAULT_CLIP_SKEW_MINUTES
}
fn default_delimiter() -> char {
    DEFAULT_DIVE_LOG_DELIMITER
}
fn default_label_column() -> String {
    DEFAULT_DIVE_LABEL_COLUMN.to_string()
}
fn default_launch_column() -> String {
    DEFAULT_LAUNCH_COLUMN.to_string()
}
fn default_recovery_column() -> String {
    DEFAULT_RECOVERY_COLUMN.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            project_name: None,
            metadata_filename: default_metadata_filename(),
            excluded_extensions: default_excluded_extensions(),
            clip_skew_minutes: default_clip_skew_minutes(),
            dive_log: None,
        }
    }
}

impl Config {
    /// Config rooted at `root` with every other field defaulted.
    pub fn for_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }

    /// Load a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RenamerError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&content)
            .map_err(|e| RenamerError::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    pub fn skew(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.clip_skew_minutes)
    }

    /// Reject combinations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.root.as_os_str().is_empty() {
            return Err(RenamerError::Config("root directory is not set".to_string()));
        }
        if self.metadata_filename.trim().is_empty() {
            return Err(RenamerError::Config("metadata_filename must not be empty".to_string()));
        }
        if self.clip_skew_minutes < 0 {
            return Err(RenamerError::Config(format!(
                "clip_skew_minutes must not be negative (got {})",
                self.clip_skew_minutes
            )));
        }
        if let Some(name) = &self.project_name {
            if name.trim().is_empty() {
                return Err(RenamerError::Config("project_name must not be empty".to_string()));
            }
        }
        if self.dive_log.is_some() && self.project_name.is_none() {
            return Err(RenamerError::Config(
                "a project name is required when a dive log is configured".to_string(),
            ));
        }
        Ok(())
    }
}
