// Rename pipeline
//
// Pass 1 labels recording directories, pass 2 flattens segment files into the
// root, pass 3 tags flattened files with their dive. Each pass re-walks the
// tree: paths collected before a rename are never reused after it.
// Per-item failures are recorded in the summary and the batch continues.

use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::dive::{dive_label, DiveLog};
use crate::error::{RenamerError, Result};
use crate::metadata::extract_label;
use crate::rename::final_name::TaggedNames;
use crate::rename::{apply_final_name, reconstruct_name, rename_directory, DirRename};
use crate::timestamp::{embedded_timestamp, parse_token};
use super::discover::{self, ListingFailure, RecorderLayout};
use super::{ItemFailure, RecordingEntry, RunSummary, Stage};

/// Run every pass. Dive tagging runs only when a dive log is configured.
pub fn run(config: &Config) -> Result<RunSummary> {
    config.validate()?;
    let root = check_root(&config.root)?;

    // Load the log up front so a bad log aborts before anything is renamed
    let dive_log = match &config.dive_log {
        Some(log_config) => Some(DiveLog::load(log_config, config.skew())?),
        None => None,
    };

    let layout = RecorderLayout::from_config(config);
    let mut summary = RunSummary::default();

    // Recordings that could not be labelled keep their files in place for a later run
    let unlabelled = label_pass(&root, &layout, &config.metadata_filename, &mut summary)?;
    flatten_pass(&root, &layout, &unlabelled, &mut summary)?;

    if let (Some(dive_log), Some(project)) = (&dive_log, config.project_name.as_deref()) {
        tag_pass(&root, &layout, dive_log, project, &mut summary)?;
    }

    Ok(summary)
}

/// Pass 1 only.
pub fn label_directories(config: &Config) -> Result<RunSummary> {
    config.validate()?;
    let root = check_root(&config.root)?;
    let mut summary = RunSummary::default();
    label_pass(&root, &RecorderLayout::from_config(config), &config.metadata_filename, &mut summary)?;
    Ok(summary)
}

/// Pass 2 only.
pub fn flatten_segments(config: &Config) -> Result<RunSummary> {
    config.validate()?;
    let root = check_root(&config.root)?;
    let mut summary = RunSummary::default();
    flatten_pass(&root, &RecorderLayout::from_config(config), &[], &mut summary)?;
    Ok(summary)
}

/// Pass 3 only. Requires a dive log and a project name.
pub fn tag_dives(config: &Config) -> Result<RunSummary> {
    config.validate()?;
    let log_config = config
        .dive_log
        .as_ref()
        .ok_or_else(|| RenamerError::Config("dive tagging needs a dive log".to_string()))?;
    let project = config
        .project_name
        .as_deref()
        .ok_or_else(|| RenamerError::Config("dive tagging needs a project name".to_string()))?;

    let root = check_root(&config.root)?;
    let dive_log = DiveLog::load(log_config, config.skew())?;

    let mut summary = RunSummary::default();
    tag_pass(&root, &RecorderLayout::from_config(config), &dive_log, project, &mut summary)?;
    Ok(summary)
}

/// List recording directories with the label each would receive. Changes nothing.
pub fn scan(config: &Config) -> Result<Vec<RecordingEntry>> {
    config.validate()?;
    let root = check_root(&config.root)?;
    let layout = RecorderLayout::from_config(config);

    let walk = discover::recording_dirs(&root, &layout)?;
    for failure in &walk.failures {
        log::warn!("Could not list {}: {}", failure.path.display(), failure.error);
    }

    let entries = walk
        .entries
        .into_iter()
        .map(|dir| {
            let segments = discover::recording_segments(&dir, &layout);
            let (label, error) = match extract_label(&dir, &config.metadata_filename) {
                Ok(label) => (Some(label), None),
                Err(e) => (None, Some(e.to_string())),
            };
            RecordingEntry {
                path: dir,
                label,
                segment_files: segments.entries.len(),
                error,
            }
        })
        .collect();

    Ok(entries)
}

fn check_root(root: &Path) -> Result<PathBuf> {
    match std::fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(root.to_path_buf()),
        Ok(_) => Err(RenamerError::Config(format!("{} is not a directory", root.display()))),
        Err(e) => Err(RenamerError::from_listing(root, e)),
    }
}

/// Returns the recording directories that failed to be labelled.
fn label_pass(
    root: &Path,
    layout: &RecorderLayout,
    metadata_filename: &str,
    summary: &mut RunSummary,
) -> Result<Vec<PathBuf>> {
    let walk = discover::recording_dirs(root, layout)?;
    record_listing_failures(&walk.failures, summary);
    log::info!("Labelling {} recording directories", walk.entries.len());

    let mut unlabelled = Vec::new();
    for (ordinal, dir) in walk.entries.iter().enumerate() {
        let label = match extract_label(dir, metadata_filename) {
            Ok(label) => label,
            Err(e) => {
                summary.record_failure(Stage::Label, dir, e);
                unlabelled.push(dir.clone());
                continue;
            }
        };
        if label.is_fallback() {
            summary.labels_defaulted += 1;
        }

        match rename_directory(dir, label.label(), ordinal) {
            Ok(DirRename::Renamed(_)) => summary.directories_renamed += 1,
            Ok(DirRename::Disambiguated(_)) => summary.directories_disambiguated += 1,
            Ok(DirRename::Unchanged(_)) => summary.directories_unchanged += 1,
            Err(e) => {
                summary.record_failure(Stage::Label, dir, e);
                unlabelled.push(dir.clone());
            }
        }
    }

    log::info!(
        "Labelled directories: {} renamed, {} disambiguated, {} unchanged",
        summary.directories_renamed,
        summary.directories_disambiguated,
        summary.directories_unchanged
    );
    Ok(unlabelled)
}

/// Files under any directory in `unlabelled` are left where they are.
fn flatten_pass(
    root: &Path,
    layout: &RecorderLayout,
    unlabelled: &[PathBuf],
    summary: &mut RunSummary,
) -> Result<()> {
    let walk = discover::segment_files(root, layout)?;
    record_listing_failures(&walk.failures, summary);
    log::info!("Flattening {} segment files into {}", walk.entries.len(), root.display());

    for segment in &walk.entries {
        if unlabelled.contains(&segment.recording_dir) {
            log::warn!(
                "{} not flattened: its recording directory has no label yet",
                segment.path.display()
            );
            summary.files_skipped += 1;
            continue;
        }
        match reconstruct_name(&segment.path, &segment.ancestor_label(), root) {
            Ok(_) => summary.files_flattened += 1,
            Err(e) => summary.record_failure(Stage::Flatten, &segment.path, e),
        }
    }

    log::info!("Flattened {} files", summary.files_flattened);
    Ok(())
}

fn tag_pass(
    root: &Path,
    layout: &RecorderLayout,
    dive_log: &DiveLog,
    project: &str,
    summary: &mut RunSummary,
) -> Result<()> {
    let files = discover::flattened_files(root, layout)?;
    let tagged = TaggedNames::new(project, dive_log.intervals.iter().map(|i| i.label.as_str()))?;

    // Only untagged files carrying a trailing recorder timestamp take part
    let mut candidates = Vec::new();
    for path in files {
        let token = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .and_then(|stem| embedded_timestamp(&stem).map(str::to_string));

        if tagged.is_tagged(&path) {
            log::debug!("{} already tagged, skipping", path.display());
            summary.files_skipped += 1;
            continue;
        }
        match token {
            Some(token) => candidates.push((path, token)),
            None => {
                log::debug!("{} has no recorder timestamp, skipping", path.display());
                summary.files_skipped += 1;
            }
        }
    }

    log::info!(
        "Tagging {} files against {} dive intervals",
        candidates.len(),
        dive_log.intervals.len()
    );

    for (row_index, (path, token)) in candidates.iter().enumerate() {
        let timestamp = parse_token(token);
        if timestamp.is_none() {
            log::warn!("{}: {} is not a valid date/time", path.display(), token);
        }

        let label = dive_label(timestamp, &dive_log.intervals, row_index);
        match apply_final_name(path, project, &label.to_string()) {
            Ok(_) => {
                summary.files_tagged += 1;
                if label.is_matched() {
                    summary.dives_matched += 1;
                } else {
                    summary.off_transect += 1;
                }
            }
            Err(e) => summary.record_failure(Stage::Tag, path, e),
        }
    }

    log::info!(
        "Tagged {} files: {} matched a dive, {} off transect",
        summary.files_tagged,
        summary.dives_matched,
        summary.off_transect
    );
    Ok(())
}

fn record_listing_failures(failures: &[ListingFailure], summary: &mut RunSummary) {
    for failure in failures {
        summary.failures.push(ItemFailure {
            stage: Stage::Discover,
            path: failure.path.clone(),
            error: failure.error.to_string(),
        });
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
