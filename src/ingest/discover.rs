// Recorder tree discovery
//
// The recorder writes a fixed layout beneath its root:
//   root/<date>/<hour>/<recording>/recording.xml
//   root/<date>/<hour>/<recording>/<segment dir>/<segment files>
// Listings are never sorted; filesystem order is preserved.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use crate::config::Config;
use crate::error::{RenamerError, Result};

/// What to skip while walking the recorder tree.
#[derive(Debug, Clone)]
pub struct RecorderLayout {
    pub metadata_filename: String,
    pub excluded_extensions: Vec<String>,
}

impl RecorderLayout {
    pub fn from_config(config: &Config) -> Self {
        Self {
            metadata_filename: config.metadata_filename.clone(),
            excluded_extensions: config
                .excluded_extensions
                .iter()
                .map(|e| e.trim_start_matches('.').to_lowercase())
                .collect(),
        }
    }

    /// True for the metadata file and for files with an excluded extension.
    pub fn is_excluded(&self, path: &Path) -> bool {
        let is_metadata = path
            .file_name()
            .map_or(false, |n| n.to_string_lossy() == self.metadata_filename);
        is_metadata || self.has_excluded_extension(path)
    }

    pub fn has_excluded_extension(&self, path: &Path) -> bool {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self.excluded_extensions.iter().any(|x| x.eq_ignore_ascii_case(ext)),
            None => false,
        }
    }
}

/// A directory below the root that could not be listed.
#[derive(Debug)]
pub struct ListingFailure {
    pub path: PathBuf,
    pub error: RenamerError,
}

/// Result of a multi-level walk: what was found plus subtrees that were skipped.
#[derive(Debug, Default)]
pub struct Walk<T> {
    pub entries: Vec<T>,
    pub failures: Vec<ListingFailure>,
}

/// A level-5 file paired with the recording directory it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentFile {
    pub path: PathBuf,
    pub recording_dir: PathBuf,
}

impl SegmentFile {
    /// Current name of the recording directory (the camera label after pass 1).
    pub fn ancestor_label(&self) -> String {
        self.recording_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// List the immediate children of `dir`, dropping anything `exclude` rejects.
pub fn enumerate_children<F>(dir: &Path, exclude: F) -> Result<Vec<PathBuf>>
where
    F: Fn(&Path) -> bool,
{
    if !dir.exists() {
        return Err(RenamerError::NotFound(dir.to_path_buf()));
    }

    let mut children = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry.map_err(|e| walk_error(dir, e))?;
        let path = entry.into_path();
        if !exclude(&path) {
            children.push(path);
        }
    }

    Ok(children)
}

/// Recording directories (level 3) beneath the root.
pub fn recording_dirs(root: &Path, layout: &RecorderLayout) -> Result<Walk<PathBuf>> {
    let mut walk = Walk::default();

    let dates = list_subdirs(root, layout)?;
    let hours = descend(&dates, layout, &mut walk.failures);
    walk.entries = descend(&hours, layout, &mut walk.failures);

    Ok(walk)
}

/// Segment files (level 5), each paired with its recording directory.
pub fn segment_files(root: &Path, layout: &RecorderLayout) -> Result<Walk<SegmentFile>> {
    let recordings = recording_dirs(root, layout)?;
    let mut walk = Walk {
        entries: Vec::new(),
        failures: recordings.failures,
    };

    for recording_dir in &recordings.entries {
        let files = recording_segments(recording_dir, layout);
        walk.failures.extend(files.failures);
        walk.entries.extend(files.entries.into_iter().map(|path| SegmentFile {
            path,
            recording_dir: recording_dir.clone(),
        }));
    }

    Ok(walk)
}

/// Files inside the segment directories (level 4) of one recording.
pub fn recording_segments(recording_dir: &Path, layout: &RecorderLayout) -> Walk<PathBuf> {
    let mut walk = Walk::default();

    let segment_dirs = match list_subdirs(recording_dir, layout) {
        Ok(dirs) => dirs,
        Err(error) => {
            skip_subtree(recording_dir, error, &mut walk.failures);
            return walk;
        }
    };

    for segment_dir in &segment_dirs {
        match enumerate_children(segment_dir, |p| p.is_dir() || layout.is_excluded(p)) {
            Ok(files) => walk.entries.extend(files),
            Err(error) => skip_subtree(segment_dir, error, &mut walk.failures),
        }
    }

    walk
}

/// Files sitting directly in the root (flattened output of pass 2).
pub fn flattened_files(root: &Path, layout: &RecorderLayout) -> Result<Vec<PathBuf>> {
    enumerate_children(root, |p| !p.is_file() || layout.is_excluded(p))
}

/// Directories directly below `dir`; files and excluded entries are dropped.
fn list_subdirs(dir: &Path, layout: &RecorderLayout) -> Result<Vec<PathBuf>> {
    enumerate_children(dir, |p| {
        if layout.is_excluded(p) {
            return true;
        }
        if !p.is_dir() {
            log::debug!("Skipping non-directory {}", p.display());
            return true;
        }
        false
    })
}

/// Walk one level down from each parent. Unreadable parents are recorded and skipped.
fn descend(parents: &[PathBuf], layout: &RecorderLayout, failures: &mut Vec<ListingFailure>) -> Vec<PathBuf> {
    let mut children = Vec::new();
    for parent in parents {
        match list_subdirs(parent, layout) {
            Ok(dirs) => children.extend(dirs),
            Err(error) => skip_subtree(parent, error, failures),
        }
    }
    children
}

fn skip_subtree(path: &Path, error: RenamerError, failures: &mut Vec<ListingFailure>) {
    log::warn!("Skipping unreadable directory {}: {}", path.display(), error);
    failures.push(ListingFailure {
        path: path.to_path_buf(),
        error,
    });
}

fn walk_error(dir: &Path, err: walkdir::Error) -> RenamerError {
    let path = err.path().map(Path::to_path_buf).unwrap_or_else(|| dir.to_path_buf());
    match err.into_io_error() {
        Some(io) => RenamerError::from_listing(&path, io),
        None => RenamerError::Format(format!("filesystem loop at {}", path.display())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn layout() -> RecorderLayout {
        RecorderLayout::from_config(&Config::default())
    }

    #[test]
    fn test_is_excluded() {
        let layout = layout();
        assert!(layout.is_excluded(Path::new("rec/recording.xml")));
        assert!(layout.is_excluded(Path::new("seg/Thumbs.db")));
        assert!(layout.is_excluded(Path::new("seg/THUMBS.DB")));
        assert!(!layout.is_excluded(Path::new("seg/20211020_143325_CB36.mkv")));
        assert!(!layout.is_excluded(Path::new("seg/20211020_143325_CB36.xml")));
    }

    #[test]
    fn test_enumerate_children_filters() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("20211020_14")).unwrap();
        std::fs::write(tmp.path().join("recording.xml"), "<Recording/>").unwrap();
        std::fs::write(tmp.path().join("Thumbs.db"), b"").unwrap();

        let layout = layout();
        let children = enumerate_children(tmp.path(), |p| layout.is_excluded(p)).unwrap();
        assert_eq!(children, vec![tmp.path().join("20211020_14")]);
    }

    #[test]
    fn test_enumerate_children_missing_dir() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        let err = enumerate_children(&missing, |_| false).unwrap_err();
        assert!(matches!(err, RenamerError::NotFound(p) if p == missing));
    }

    #[test]
    fn test_segment_files_walk() {
        let tmp = TempDir::new().unwrap();
        let recording = tmp.path().join("20211020/14/20211020_143325_B4F5_ACCC8EE207AE");
        let segment = recording.join("20211020_14");
        std::fs::create_dir_all(&segment).unwrap();
        std::fs::write(recording.join("recording.xml"), "<Recording/>").unwrap();
        std::fs::write(segment.join("20211020_143325_CB36.mkv"), b"video").unwrap();
        std::fs::write(segment.join("Thumbs.db"), b"").unwrap();
        // Stray file at the hour level is ignored
        std::fs::write(tmp.path().join("20211020/14/notes.txt"), b"").unwrap();

        let layout = layout();
        let recordings = recording_dirs(tmp.path(), &layout).unwrap();
        assert_eq!(recordings.entries, vec![recording.clone()]);

        let walk = segment_files(tmp.path(), &layout).unwrap();
        assert!(walk.failures.is_empty());
        assert_eq!(walk.entries.len(), 1);
        assert_eq!(walk.entries[0].path, segment.join("20211020_143325_CB36.mkv"));
        assert_eq!(walk.entries[0].ancestor_label(), "20211020_143325_B4F5_ACCC8EE207AE");
    }

    #[test]
    fn test_flattened_files_skips_dirs() {
        let tmp = TempDir::new().unwrap();
        std::fs::create_dir(tmp.path().join("20211020")).unwrap();
        std::fs::write(tmp.path().join("Pilot_Cam_20211020_143325.mkv"), b"").unwrap();

        let files = flattened_files(tmp.path(), &layout()).unwrap();
        assert_eq!(files, vec![tmp.path().join("Pilot_Cam_20211020_143325.mkv")]);
    }
}
