// recording.xml reader
// The label lives at Recording/CustomAttributes/TriggerName. Lookup is by element
// name so extra or reordered attributes between recorder firmware versions don't matter.

use std::path::Path;
use quick_xml::events::Event;
use quick_xml::Reader;
use crate::constants::TRIGGER_NAME_PATH;
use crate::error::MetadataError;

/// Read the trigger name from a recorder metadata file.
pub fn read_trigger_name(path: &Path) -> Result<String, MetadataError> {
    let bytes = std::fs::read(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MetadataError::Missing(path.to_path_buf()),
        _ => MetadataError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;

    match find_element_text(&bytes, &TRIGGER_NAME_PATH) {
        Ok(Some(text)) if !text.trim().is_empty() => Ok(text.trim().to_string()),
        Ok(_) => Err(MetadataError::FieldAbsent(path.to_path_buf())),
        Err(reason) => Err(MetadataError::Malformed {
            path: path.to_path_buf(),
            reason,
        }),
    }
}

/// Text content of the first element whose local-name path from the document
/// root equals `target`. `Ok(None)` when no such element exists.
pub(crate) fn find_element_text(xml: &[u8], target: &[&str]) -> Result<Option<String>, String> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<String> = Vec::new();
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                stack.push(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                if path_matches(&stack, target) {
                    text.clear();
                }
            }
            Ok(Event::Empty(e)) => {
                stack.push(String::from_utf8_lossy(e.local_name().as_ref()).to_string());
                if path_matches(&stack, target) {
                    return Ok(Some(String::new()));
                }
                stack.pop();
            }
            Ok(Event::Text(t)) => {
                if path_matches(&stack, target) {
                    let unescaped = t.unescape().map_err(|e| e.to_string())?;
                    text.push_str(&unescaped);
                }
            }
            Ok(Event::CData(c)) => {
                if path_matches(&stack, target) {
                    text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Ok(Event::End(_)) => {
                if path_matches(&stack, target) {
                    return Ok(Some(text));
                }
                stack.pop();
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!("at byte {}: {}", reader.error_position(), e));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(None)
}

fn path_matches(stack: &[String], target: &[&str]) -> bool {
    stack.len() == target.len() && stack.iter().zip(target).all(|(a, b)| a == b)
}

#[cfg(test)]
mod tests {
    use super::*;

    const AXIS_RECORDING: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Recording RecordingToken="20211020_143325_B4F5_ACCC8EE207AE">
  <StartTime>2021-10-20T14:33:25.000000Z</StartTime>
  <StopTime>2021-10-20T15:02:11.000000Z</StopTime>
  <Source>1</Source>
  <Tracks><Track>video</Track></Tracks>
  <Codec>H.264</Codec>
  <Resolution>704x576</Resolution>
  <CustomAttributes>
    <RecordingProfile>continuous</RecordingProfile>
    <TriggerName>Pilot_Cam_Record</TriggerName>
    <Channel>1</Channel>
  </CustomAttributes>
</Recording>"#;

    #[test]
    fn test_finds_trigger_name_by_path() {
        let text = find_element_text(AXIS_RECORDING.as_bytes(), &TRIGGER_NAME_PATH).unwrap();
        assert_eq!(text.as_deref(), Some("Pilot_Cam_Record"));
    }

    #[test]
    fn test_ignores_trigger_name_outside_custom_attributes() {
        let xml = r#"<Recording>
  <TriggerName>wrong</TriggerName>
  <Other><CustomAttributes><TriggerName>also wrong</TriggerName></CustomAttributes></Other>
  <CustomAttributes><TriggerName>Forward_Cam</TriggerName></CustomAttributes>
</Recording>"#;
        let text = find_element_text(xml.as_bytes(), &TRIGGER_NAME_PATH).unwrap();
        assert_eq!(text.as_deref(), Some("Forward_Cam"));
    }

    #[test]
    fn test_namespaced_and_escaped() {
        let xml = r#"<ax:Recording xmlns:ax="urn:axis"><ax:CustomAttributes><ax:TriggerName>Cam &amp; Light</ax:TriggerName></ax:CustomAttributes></ax:Recording>"#;
        let text = find_element_text(xml.as_bytes(), &TRIGGER_NAME_PATH).unwrap();
        assert_eq!(text.as_deref(), Some("Cam & Light"));
    }

    #[test]
    fn test_absent_and_empty_field() {
        let absent = r#"<Recording><CustomAttributes><Channel>1</Channel></CustomAttributes></Recording>"#;
        assert_eq!(find_element_text(absent.as_bytes(), &TRIGGER_NAME_PATH).unwrap(), None);

        let empty = r#"<Recording><CustomAttributes><TriggerName/></CustomAttributes></Recording>"#;
        assert_eq!(
            find_element_text(empty.as_bytes(), &TRIGGER_NAME_PATH).unwrap().as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_malformed_document() {
        let broken = r#"<Recording><CustomAttributes></Recording>"#;
        assert!(find_element_text(broken.as_bytes(), &TRIGGER_NAME_PATH).is_err());
    }

    #[test]
    fn test_read_trigger_name_errors() {
        let tmp = tempfile::TempDir::new().unwrap();
        let missing = tmp.path().join("recording.xml");
        assert!(matches!(read_trigger_name(&missing), Err(MetadataError::Missing(_))));

        std::fs::write(&missing, "<Recording><CustomAttributes><TriggerName>  </TriggerName></CustomAttributes></Recording>").unwrap();
        assert!(matches!(read_trigger_name(&missing), Err(MetadataError::FieldAbsent(_))));

        std::fs::write(&missing, AXIS_RECORDING).unwrap();
        assert_eq!(read_trigger_name(&missing).unwrap(), "Pilot_Cam_Record");
    }
}
