// Renaming operations for recordings, segment files and dive tagging

pub mod directory;
pub mod segment;
pub mod final_name;

use std::fs;
use std::path::Path;
use crate::error::{RenamerError, Result};

pub use directory::{rename_directory, DirRename};
pub use segment::{reconstruct_name, reconstructed_file_name};
pub use final_name::{apply_final_name, build_final_path};

/// Characters that cannot appear in a single path component on common filesystems.
const ILLEGAL_COMPONENT_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make a free-text label safe to use as one path component.
/// Returns `None` when nothing meaningful is left.
pub fn sanitize_component(raw: &str) -> Option<String> {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_control() || ILLEGAL_COMPONENT_CHARS.contains(&c) {
                '_'
            } else {
                c
            }
        })
        .collect();

    if cleaned.chars().all(|c| c == '_' || c == '.' || c.is_whitespace()) {
        return None;
    }

    Some(cleaned)
}

/// Rename `from` to `to`, refusing to replace anything already at `to`.
///
/// `fs::rename` silently replaces files and empty directories on Unix, so the
/// destination is checked first. The tree is assumed to be exclusively ours
/// for the duration of a run.
pub(crate) fn move_path(from: &Path, to: &Path) -> Result<()> {
    if to.symlink_metadata().is_ok() {
        return Err(RenamerError::DestinationExists(to.to_path_buf()));
    }

    fs::rename(from, to).map_err(|source| RenamerError::Move {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_sanitize_component() {
        assert_eq!(sanitize_component("Pilot_Cam_Record").as_deref(), Some("Pilot_Cam_Record"));
        assert_eq!(sanitize_component("  Fwd Cam  ").as_deref(), Some("Fwd Cam"));
        assert_eq!(sanitize_component("A/B\\C:D").as_deref(), Some("A_B_C_D"));
        assert_eq!(sanitize_component("Dive\t3").as_deref(), Some("Dive_3"));
        assert_eq!(sanitize_component(""), None);
        assert_eq!(sanitize_component(".."), None);
        assert_eq!(sanitize_component("/:/"), None);
    }

    #[test]
    fn test_move_path_refuses_existing_destination() {
        let tmp = TempDir::new().unwrap();
        let a = tmp.path().join("a.mkv");
        let b = tmp.path().join("b.mkv");
        std::fs::write(&a, b"a").unwrap();
        std::fs::write(&b, b"b").unwrap();

        let err = move_path(&a, &b).unwrap_err();
        assert!(matches!(err, RenamerError::DestinationExists(p) if p == b));
        assert_eq!(std::fs::read(&b).unwrap(), b"b");

        let c = tmp.path().join("c.mkv");
        move_path(&a, &c).unwrap();
        assert!(!a.exists());
        assert_eq!(std::fs::read(&c).unwrap(), b"a");
    }

    #[test]
    fn test_move_path_missing_source() {
        let tmp = TempDir::new().unwrap();
        let err = move_path(&tmp.path().join("gone"), &tmp.path().join("dest")).unwrap_err();
        assert!(matches!(err, RenamerError::Move { .. }));
    }
}
