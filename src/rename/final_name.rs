// Dive tagging (pass 3): <project>_<dive label>_<basename>

use std::path::{Path, PathBuf};
use regex::Regex;
use crate::constants::{LABEL_SEPARATOR, OFF_TRANSECT_PREFIX};
use crate::error::{RenamerError, Result};
use super::move_path;

/// Destination for a flattened file once its dive is known. The file stays
/// in its current directory (the recorder root after pass 2).
pub fn build_final_path(original: &Path, project_name: &str, dive_label: &str) -> Result<PathBuf> {
    let basename = original
        .file_name()
        .map(|n| n.to_string_lossy())
        .ok_or_else(|| RenamerError::Format(format!("no file name in {}", original.display())))?;
    let parent = original.parent().unwrap_or_else(|| Path::new("."));

    Ok(parent.join(format!(
        "{}{sep}{}{sep}{}",
        project_name,
        dive_label,
        basename,
        sep = LABEL_SEPARATOR
    )))
}

/// Recognizes names written by an earlier tagging run:
/// `<project>_<dive label | Off_transect_N>_<camera label>_<YYYYMMDD_HHMMSS>`.
///
/// A camera label that merely starts with the project name does not match.
#[derive(Debug, Clone)]
pub struct TaggedNames {
    pattern: Regex,
}

impl TaggedNames {
    pub fn new<'a>(project_name: &str, dive_labels: impl IntoIterator<Item = &'a str>) -> Result<Self> {
        let mut labels: Vec<String> = dive_labels.into_iter().map(regex::escape).collect();
        labels.push(format!(r"{}\d+", regex::escape(OFF_TRANSECT_PREFIX)));

        let pattern = format!(
            r"^{}{sep}(?:{}){sep}.+{sep}\d{{8}}_\d{{6}}$",
            regex::escape(project_name),
            labels.join("|"),
            sep = LABEL_SEPARATOR
        );
        let pattern = Regex::new(&pattern)
            .map_err(|e| RenamerError::Format(format!("cannot build tagged name pattern: {}", e)))?;

        Ok(Self { pattern })
    }

    pub fn is_tagged(&self, path: &Path) -> bool {
        path.file_stem()
            .map_or(false, |stem| self.pattern.is_match(&stem.to_string_lossy()))
    }
}

/// Rename a flattened file to its dive-tagged name.
pub fn apply_final_name(original: &Path, project_name: &str, dive_label: &str) -> Result<PathBuf> {
    let dest = build_final_path(original, project_name, dive_label)?;
    move_path(original, &dest)?;
    log::debug!("Tagged {} -> {}", original.display(), dest.display());
    Ok(dest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_build_final_path() {
        let path = build_final_path(
            Path::new("/data/axis-0e35ff78e/Pilot_Cam_Record_20211020_143325.mkv"),
            "EX2104",
            "Dive_03",
        )
        .unwrap();
        assert_eq!(
            path,
            PathBuf::from("/data/axis-0e35ff78e/EX2104_Dive_03_Pilot_Cam_Record_20211020_143325.mkv")
        );
    }

    #[test]
    fn test_tagged_names() {
        let tagged = TaggedNames::new("EX2104", ["Dive_03", "T.4"]).unwrap();

        assert!(tagged.is_tagged(Path::new("r/EX2104_Dive_03_Fwd_20211020_143325.mkv")));
        assert!(tagged.is_tagged(Path::new("r/EX2104_Off_transect_12_Fwd_20211020_143325.mkv")));
        assert!(tagged.is_tagged(Path::new("r/EX2104_T.4_Fwd_20211020_143325.mkv")));

        assert!(!tagged.is_tagged(Path::new("r/Fwd_20211020_143325.mkv")));
        assert!(!tagged.is_tagged(Path::new("r/EX2104x_Fwd.mkv")));
        // Dive label characters are literal
        assert!(!tagged.is_tagged(Path::new("r/EX2104_Tx4_Fwd_20211020_143325.mkv")));
        // Unknown dive label
        assert!(!tagged.is_tagged(Path::new("r/EX2104_Dive_09_Fwd_20211020_143325.mkv")));
    }

    #[test]
    fn test_camera_label_starting_with_project_is_not_tagged() {
        let tagged = TaggedNames::new("ROV", ["Dive_01"]).unwrap();
        assert!(!tagged.is_tagged(Path::new("r/ROV_Pilot_Cam_20211020_143325.mkv")));
        assert!(tagged.is_tagged(Path::new("r/ROV_Dive_01_ROV_Pilot_Cam_20211020_143325.mkv")));
        assert!(tagged.is_tagged(Path::new("r/ROV_Off_transect_0_ROV_Pilot_Cam_20211020_143325.mkv")));
    }

    #[test]
    fn test_apply_final_name() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("Fwd_20211020_143325.mkv");
        std::fs::write(&file, b"video").unwrap();

        let dest = apply_final_name(&file, "EX2104", "Off_transect_0").unwrap();
        assert_eq!(dest, tmp.path().join("EX2104_Off_transect_0_Fwd_20211020_143325.mkv"));
        assert!(dest.exists());
        assert!(!file.exists());

        // Same failure contract as segment moves
        std::fs::write(&file, b"again").unwrap();
        let err = apply_final_name(&file, "EX2104", "Off_transect_0").unwrap_err();
        assert!(matches!(err, RenamerError::DestinationExists(_)));
    }
}
