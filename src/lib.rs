// NVR Renamer - Library Entry Point
//
// Reorganizes footage written by a network video recorder on an ROV:
// recording directories are renamed after their camera, segment files are
// flattened into the recorder root, and files are optionally tagged with the
// dive they were recorded during.

pub mod constants;
pub mod error;
pub mod config;
pub mod timestamp;
pub mod metadata;
pub mod rename;
pub mod dive;
pub mod ingest;

pub use config::{Config, DiveLogConfig};
pub use error::{RenamerError, Result};
pub use ingest::{RecordingEntry, RunSummary};
