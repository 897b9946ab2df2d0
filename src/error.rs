// NVR Renamer Error Types

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RenamerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("Unexpected file name format: {0}")]
    Format(String),

    #[error("Destination already exists: {}", .0.display())]
    DestinationExists(PathBuf),

    #[error("Failed to move {} -> {}: {source}", .from.display(), .to.display())]
    Move {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Metadata error: {0}")]
    Metadata(#[from] MetadataError),

    #[error("Dive log error: {0}")]
    DiveLog(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Why a recording's metadata file could not produce a label.
/// Only `Io` is treated as a real failure; the rest fall back to the default label.
#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("metadata file missing: {}", .0.display())]
    Missing(PathBuf),

    #[error("metadata file malformed: {}: {reason}", .path.display())]
    Malformed { path: PathBuf, reason: String },

    #[error("TriggerName not found in {}", .0.display())]
    FieldAbsent(PathBuf),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl MetadataError {
    /// Missing, malformed or incomplete metadata never aborts a batch.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, MetadataError::Io { .. })
    }
}

impl RenamerError {
    /// Map a directory listing error onto the path-aware variants.
    pub fn from_listing(path: &std::path::Path, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => RenamerError::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => RenamerError::PermissionDenied(path.to_path_buf()),
            _ => RenamerError::Io(err),
        }
    }
}

pub type Result<T> = std::result::Result<T, RenamerError>;
