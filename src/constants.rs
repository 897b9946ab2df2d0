// NVR Renamer Constants
// Defaults for the recorder layout and dive log. Most are overridable from config.

// Recorder layout
pub const DEFAULT_METADATA_FILENAME: &str = "recording.xml";
pub const DEFAULT_EXCLUDED_EXTENSIONS: [&str; 1] = ["db"]; // Thumbs.db thumbnail databases

// Element path to the camera label inside recording.xml
pub const TRIGGER_NAME_PATH: [&str; 3] = ["Recording", "CustomAttributes", "TriggerName"];

// Labels
pub const FALLBACK_LABEL: &str = "Unknown_Camera";
pub const OFF_TRANSECT_PREFIX: &str = "Off_transect_";
pub const LABEL_SEPARATOR: char = '_';

// Segment file names: 8-digit date, underscore, 6-digit time
pub const RECORDED_TIMESTAMP_PATTERN: &str = r"^\d{8}_\d{6}";
pub const RECORDED_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
pub const RECORDED_TIMESTAMP_LEN: usize = 15;

// Dive log
pub const DEFAULT_CLIP_SKEW_MINUTES: i64 = 5;
pub const DEFAULT_DIVE_LOG_DELIMITER: char = ',';
pub const DEFAULT_DIVE_LABEL_COLUMN: &str = "Dive";
pub const DEFAULT_LAUNCH_COLUMN: &str = "Launch";
pub const DEFAULT_RECOVERY_COLUMN: &str = "Recovery";

// Accepted dive log date-time layouts, tried in order. Year first only:
// 10/11/2021 reads differently in day-first and month-first locales.
pub const DIVE_LOG_TIME_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
];
