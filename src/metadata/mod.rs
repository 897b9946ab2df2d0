// Recording metadata: camera label lookup with fallback

pub mod recording_xml;

use std::path::Path;
use serde::Serialize;
use crate::constants::FALLBACK_LABEL;
use crate::error::Result;
use crate::rename::sanitize_component;

pub use recording_xml::read_trigger_name;

/// Where a recording's label came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "label", rename_all = "snake_case")]
pub enum LabelSource {
    Metadata(String),
    Fallback(String),
}

impl LabelSource {
    pub fn label(&self) -> &str {
        match self {
            LabelSource::Metadata(l) | LabelSource::Fallback(l) => l,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, LabelSource::Fallback(_))
    }
}

/// Extract the camera label for a recording directory.
///
/// Missing, malformed or incomplete metadata yields `Unknown_Camera`; I/O
/// errors other than a missing file are returned to the caller.
pub fn extract_label(dir: &Path, metadata_filename: &str) -> Result<LabelSource> {
    let path = dir.join(metadata_filename);

    match read_trigger_name(&path) {
        Ok(raw) => match sanitize_component(&raw) {
            Some(label) => {
                if label != raw {
                    log::debug!("Sanitized label {:?} -> {:?}", raw, label);
                }
                Ok(LabelSource::Metadata(label))
            }
            None => {
                log::warn!("Unusable TriggerName {:?} in {}, using {}", raw, path.display(), FALLBACK_LABEL);
                Ok(LabelSource::Fallback(FALLBACK_LABEL.to_string()))
            }
        },
        Err(e) if e.is_recoverable() => {
            log::warn!("{}, using {}", e, FALLBACK_LABEL);
            Ok(LabelSource::Fallback(FALLBACK_LABEL.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}
