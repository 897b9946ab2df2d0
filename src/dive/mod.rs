// Dive matching
// Assigns each recording timestamp the dive/transect whose interval contains it.
// Scan is first-match in log order; overlapping intervals are not resolved further.

pub mod logbook;

use std::fmt;
use chrono::NaiveDateTime;
use serde::{Serialize, Serializer};
use crate::constants::OFF_TRANSECT_PREFIX;

pub use logbook::{parse_log_time, DiveLog};

/// One dive log row. `start` is the launch time already moved back by the
/// clip-boundary skew. Missing bounds never match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiveInterval {
    pub label: String,
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl DiveInterval {
    /// Strict containment: a timestamp on either boundary is outside.
    pub fn contains(&self, t: NaiveDateTime) -> bool {
        match (self.start, self.end) {
            (Some(start), Some(end)) => start < t && t < end,
            _ => false,
        }
    }
}

/// Label assigned to a flattened file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiveLabel {
    Dive(String),
    /// No interval contains the file; carries the file's position in its pass.
    OffTransect(usize),
}

impl DiveLabel {
    pub fn is_matched(&self) -> bool {
        matches!(self, DiveLabel::Dive(_))
    }
}

impl fmt::Display for DiveLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiveLabel::Dive(label) => f.write_str(label),
            DiveLabel::OffTransect(row) => write!(f, "{}{}", OFF_TRANSECT_PREFIX, row),
        }
    }
}

impl Serialize for DiveLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// First interval, in log order, that strictly contains `timestamp`.
pub fn match_dive(timestamp: NaiveDateTime, intervals: &[DiveInterval]) -> Option<&DiveInterval> {
    intervals.iter().find(|interval| interval.contains(timestamp))
}

/// Dive label for a file, or `Off_transect_<row_index>` when nothing matches.
pub fn dive_label(timestamp: Option<NaiveDateTime>, intervals: &[DiveInterval], row_index: usize) -> DiveLabel {
    timestamp
        .and_then(|t| match_dive(t, intervals))
        .map(|interval| DiveLabel::Dive(interval.label.clone()))
        .unwrap_or(DiveLabel::OffTransect(row_index))
}
