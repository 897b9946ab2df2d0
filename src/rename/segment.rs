// Segment file reconstruction (pass 2)
// 20211020_143325_CB36.mkv under recording "Pilot_Cam_Record"
//   -> <root>/Pilot_Cam_Record_20211020_143325.mkv

use std::path::{Path, PathBuf};
use crate::constants::LABEL_SEPARATOR;
use crate::error::{RenamerError, Result};
use crate::timestamp::recorded_timestamp;
use super::move_path;

/// Build `<label>_<YYYYMMDD_HHMMSS><ext>` for a raw recorder file.
/// The extension is kept exactly as found, including its case.
pub fn reconstructed_file_name(file: &Path, label: &str) -> Result<String> {
    let stem = file
        .file_stem()
        .map(|s| s.to_string_lossy())
        .ok_or_else(|| RenamerError::Format(format!("no file name in {}", file.display())))?;

    let token = recorded_timestamp(&stem).ok_or_else(|| {
        RenamerError::Format(format!(
            "{} does not start with a YYYYMMDD_HHMMSS timestamp",
            file.display()
        ))
    })?;

    let ext = file
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    Ok(format!("{}{}{}{}", label, LABEL_SEPARATOR, token, ext))
}

/// Move a segment file into `dest_root` under its reconstructed name.
pub fn reconstruct_name(file: &Path, label: &str, dest_root: &Path) -> Result<PathBuf> {
    let name = reconstructed_file_name(file, label)?;
    let dest = dest_root.join(name);

    move_path(file, &dest)?;
    log::debug!("Moved {} -> {}", file.display(), dest.display());

    Ok(dest)
}
