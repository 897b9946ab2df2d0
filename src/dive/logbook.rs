// Dive log loading
//
// Delimited text with a header row, e.g.
//   Dive,Launch,Recovery,Notes
//   Dive_01,2021-10-20 09:12:00,2021-10-20 11:48:30,
//   Dive_02,2021-10-20 14:30:00,2021-10-20 15:00:00,transect 4
// Columns are found by header name. Cells that don't parse as a date-time
// become empty bounds; those rows load but never match.

use std::io::Read;
use std::path::PathBuf;
use chrono::{Duration, NaiveDateTime};
use csv::{StringRecord, Trim};
use crate::config::{DiveLogColumns, DiveLogConfig};
use crate::constants::DIVE_LOG_TIME_FORMATS;
use crate::error::{RenamerError, Result};
use crate::rename::sanitize_component;
use super::DiveInterval;

#[derive(Debug, Clone)]
pub struct DiveLog {
    pub source: PathBuf,
    pub intervals: Vec<DiveInterval>,
}

/// Header positions of the three required columns.
struct ColumnIndex {
    label: usize,
    launch: usize,
    recovery: usize,
}

impl DiveLog {
    /// Read and parse a dive log file. Any failure here is fatal for the run.
    pub fn load(config: &DiveLogConfig, skew: Duration) -> Result<Self> {
        let file = std::fs::File::open(&config.path).map_err(|e| {
            RenamerError::DiveLog(format!("cannot open {}: {}", config.path.display(), e))
        })?;

        let mut log = Self::from_reader(file, config, skew).map_err(|e| match e {
            RenamerError::DiveLog(msg) => {
                RenamerError::DiveLog(format!("{}: {}", config.path.display(), msg))
            }
            other => other,
        })?;
        log.source = config.path.clone();

        log::info!(
            "Loaded {} dive intervals from {}",
            log.intervals.len(),
            config.path.display()
        );
        Ok(log)
    }

    pub fn from_reader<R: Read>(reader: R, config: &DiveLogConfig, skew: Duration) -> Result<Self> {
        let delimiter = u8::try_from(config.delimiter)
            .ok()
            .filter(|b| b.is_ascii())
            .ok_or_else(|| {
                RenamerError::Config(format!("dive log delimiter {:?} is not ASCII", config.delimiter))
            })?;

        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers = csv_reader
            .headers()
            .map_err(|e| RenamerError::DiveLog(format!("unreadable header row: {}", e)))?
            .clone();
        let columns = locate_columns(&headers, &config.columns)?;

        let mut intervals = Vec::new();
        for (row_idx, record) in csv_reader.records().enumerate() {
            // Header is line 1
            let line = row_idx + 2;
            let record = record.map_err(|e| RenamerError::DiveLog(format!("line {}: {}", line, e)))?;

            let raw_label = record.get(columns.label).unwrap_or("");
            let label = match sanitize_component(raw_label) {
                Some(label) => label,
                None => {
                    log::warn!("Dive log line {} has no label, skipping", line);
                    continue;
                }
            };

            let launch = parse_cell(&record, columns.launch, line);
            let recovery = parse_cell(&record, columns.recovery, line);

            intervals.push(DiveInterval {
                label,
                start: launch.and_then(|t| t.checked_sub_signed(skew)),
                end: recovery,
            });
        }

        Ok(Self {
            source: PathBuf::new(),
            intervals,
        })
    }
}

/// Parse a dive log date-time in any of the accepted layouts.
pub fn parse_log_time(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    DIVE_LOG_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
}

fn parse_cell(record: &StringRecord, index: usize, line: usize) -> Option<NaiveDateTime> {
    let value = record.get(index).unwrap_or("");
    let parsed = parse_log_time(value);
    if parsed.is_none() {
        if value.trim().is_empty() {
            log::debug!("Dive log line {}: empty time cell", line);
        } else {
            log::warn!("Dive log line {}: unparsable time {:?}, row will not match", line, value);
        }
    }
    parsed
}

fn locate_columns(headers: &StringRecord, names: &DiveLogColumns) -> Result<ColumnIndex> {
    let find = |wanted: &str| -> Result<usize> {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim().eq_ignore_ascii_case(wanted.trim()))
            .ok_or_else(|| {
                RenamerError::DiveLog(format!(
                    "missing column {:?} (found: {})",
                    wanted,
                    headers.iter().collect::<Vec<_>>().join(", ")
                ))
            })
    };

    Ok(ColumnIndex {
        label: find(&names.label)?,
        launch: find(&names.launch)?,
        recovery: find(&names.recovery)?,
    })
}
