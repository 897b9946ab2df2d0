// Recorder tree processing: discovery and the rename pipeline

pub mod discover;
pub mod pipeline;

use std::fmt;
use std::path::{Path, PathBuf};
use serde::Serialize;
use crate::metadata::LabelSource;

pub use pipeline::{flatten_segments, label_directories, run, scan, tag_dives};

/// Pipeline stage an item failed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Discover,
    Label,
    Flatten,
    Tag,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Discover => "discover",
            Stage::Label => "label",
            Stage::Flatten => "flatten",
            Stage::Tag => "tag",
        };
        f.write_str(name)
    }
}

/// One item that was reported and skipped.
#[derive(Debug, Clone, Serialize)]
pub struct ItemFailure {
    pub stage: Stage,
    pub path: PathBuf,
    pub error: String,
}

/// Counts for one run. Serialized as the `--report` file.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    pub directories_renamed: usize,
    pub directories_disambiguated: usize,
    pub directories_unchanged: usize,
    pub labels_defaulted: usize,
    pub files_flattened: usize,
    pub files_tagged: usize,
    pub dives_matched: usize,
    pub off_transect: usize,
    pub files_skipped: usize,
    pub failures: Vec<ItemFailure>,
}

impl RunSummary {
    pub fn record_failure(&mut self, stage: Stage, path: &Path, error: impl fmt::Display) {
        log::warn!("[{}] {}: {}", stage, path.display(), error);
        self.failures.push(ItemFailure {
            stage,
            path: path.to_path_buf(),
            error: error.to_string(),
        });
    }

    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Read-only view of one recording directory, as reported by `scan`.
#[derive(Debug, Clone, Serialize)]
pub struct RecordingEntry {
    pub path: PathBuf,
    pub label: Option<LabelSource>,
    pub segment_files: usize,
    pub error: Option<String>,
}
