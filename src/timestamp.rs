// Recorder timestamp tokens in file names (YYYYMMDD_HHMMSS)

use std::sync::OnceLock;
use chrono::NaiveDateTime;
use regex::Regex;
use crate::constants::{RECORDED_TIMESTAMP_FORMAT, RECORDED_TIMESTAMP_LEN, RECORDED_TIMESTAMP_PATTERN};

fn leading_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RECORDED_TIMESTAMP_PATTERN).expect("valid timestamp pattern"))
}

fn trailing_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?:^|_)(\d{8}_\d{6})$").expect("valid timestamp pattern"))
}

/// Leading timestamp token of a raw recorder file stem,
/// e.g. `20211020_143325` from `20211020_143325_CB36`.
pub fn recorded_timestamp(stem: &str) -> Option<&str> {
    leading_regex().find(stem).map(|m| m.as_str())
}

/// Trailing timestamp token of a flattened file stem,
/// e.g. `20211020_143325` from `Pilot_Cam_Record_20211020_143325`.
pub fn embedded_timestamp(stem: &str) -> Option<&str> {
    trailing_regex()
        .captures(stem)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

/// Parse a `YYYYMMDD_HHMMSS` token. Digit strings that are not a real
/// calendar date/time (month 13, hour 25) give `None`.
pub fn parse_token(token: &str) -> Option<NaiveDateTime> {
    if token.len() != RECORDED_TIMESTAMP_LEN {
        return None;
    }
    NaiveDateTime::parse_from_str(token, RECORDED_TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_recorded_timestamp() {
        assert_eq!(recorded_timestamp("20211020_143325_CB36"), Some("20211020_143325"));
        assert_eq!(recorded_timestamp("20211020_143325"), Some("20211020_143325"));
        assert_eq!(recorded_timestamp("Pilot_20211020_143325"), None);
        assert_eq!(recorded_timestamp("2021102_143325_CB36"), None);
        assert_eq!(recorded_timestamp("Thumbs"), None);
    }

    #[test]
    fn test_embedded_timestamp() {
        assert_eq!(embedded_timestamp("Pilot_Cam_Record_20211020_143325"), Some("20211020_143325"));
        assert_eq!(embedded_timestamp("20211020_143325"), Some("20211020_143325"));
        assert_eq!(embedded_timestamp("EX2104_Dive_03_Pilot_Cam_20211020_143325"), Some("20211020_143325"));
        assert_eq!(embedded_timestamp("dives"), None);
        assert_eq!(embedded_timestamp("Cam120211020_143325"), None);
        assert_eq!(embedded_timestamp("Cam_20211020_143325_CB36"), None);
    }

    #[test]
    fn test_parse_token() {
        let expected = NaiveDate::from_ymd_opt(2021, 10, 20)
            .unwrap()
            .and_hms_opt(14, 33, 25)
            .unwrap();
        assert_eq!(parse_token("20211020_143325"), Some(expected));
        assert_eq!(parse_token("20211320_143325"), None);
        assert_eq!(parse_token("20211020_253325"), None);
    }
}
