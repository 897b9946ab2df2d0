// Recording directory renaming (pass 1)

use std::path::{Path, PathBuf};
use crate::constants::LABEL_SEPARATOR;
use crate::error::{RenamerError, Result};
use super::move_path;

/// Outcome of renaming one recording directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirRename {
    /// Already carries its label from an earlier run.
    Unchanged(PathBuf),
    Renamed(PathBuf),
    /// The plain label was taken by a sibling; the pass ordinal was appended.
    Disambiguated(PathBuf),
}

impl DirRename {
    pub fn path(&self) -> &Path {
        match self {
            DirRename::Unchanged(p) | DirRename::Renamed(p) | DirRename::Disambiguated(p) => p,
        }
    }
}

/// Rename `dir` to `label` within its parent.
///
/// On collision, retries once as `<label>_<ordinal>` where `ordinal` is the
/// directory's position in the current pass.
pub fn rename_directory(dir: &Path, label: &str, ordinal: usize) -> Result<DirRename> {
    let current = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| RenamerError::Format(format!("no directory name in {}", dir.display())))?;

    if is_labelled(&current, label) {
        log::debug!("{} already labelled as {}", dir.display(), label);
        return Ok(DirRename::Unchanged(dir.to_path_buf()));
    }

    let parent = dir.parent().unwrap_or_else(|| Path::new("."));
    let target = parent.join(label);

    match move_path(dir, &target) {
        Ok(()) => {
            log::debug!("Renamed {} -> {}", dir.display(), target.display());
            Ok(DirRename::Renamed(target))
        }
        Err(RenamerError::DestinationExists(_)) => {
            let fallback = parent.join(format!("{}{}{}", label, LABEL_SEPARATOR, ordinal));
            move_path(dir, &fallback)?;
            log::info!(
                "Label {} already taken in {}, renamed {} -> {}",
                label,
                parent.display(),
                current,
                fallback.display()
            );
            Ok(DirRename::Disambiguated(fallback))
        }
        Err(e) => Err(e),
    }
}

/// True when `name` is `label` or `label_<digits>` (a collision suffix from an earlier run).
fn is_labelled(name: &str, label: &str) -> bool {
    if name == label {
        return true;
    }
    name.strip_prefix(label)
        .and_then(|rest| rest.strip_prefix(LABEL_SEPARATOR))
        .map_or(false, |suffix| !suffix.is_empty() && suffix.chars().all(|c| c.is_ascii_digit()))
}
