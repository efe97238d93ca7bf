//! JSON Lines capture reader
//!
//! Reads LIN analyzer frames exported one JSON object per line:
//!
//! ```text
//! {"type":"header_break","start_time":0.000100,"end_time":0.000780}
//! {"type":"header_pid","protected_id":5,"start_time":0.001300,"end_time":0.001820}
//! {"type":"data","data":100,"start_time":0.001900,"end_time":0.002420}
//! {"type":"data_or_checksum","data":154,"start_time":0.003100,"end_time":0.003620}
//! ```
//!
//! ## Supported Frame Types
//! - `header_break`, `header_pid`, `data`, `data_or_checksum`
//!
//! Other analyzer frame types (`header_sync`, error frames, ...) carry nothing
//! the transaction assembler needs and are skipped.

use crate::formats::CaptureReader;
use crate::types::{BusEvent, DecoderError, Result};
use serde_json::Value;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

/// JSON Lines capture reader
pub struct JsonLinesReader;

impl JsonLinesReader {
    /// Open a JSON Lines capture and return an iterator over bus events
    pub fn open(path: &Path) -> Result<JsonLinesEventIterator<BufReader<File>>> {
        log::info!("Opening JSON Lines capture: {:?}", path);

        let file = File::open(path)?;
        Ok(Self::from_reader(BufReader::new(file)))
    }

    /// Read bus events from any buffered reader
    pub fn from_reader<R: BufRead>(reader: R) -> JsonLinesEventIterator<R> {
        JsonLinesEventIterator {
            lines: reader.lines(),
            line_number: 0,
            skipped_types: HashSet::new(),
        }
    }
}

/// Iterator over bus events from a JSON Lines capture
pub struct JsonLinesEventIterator<R> {
    lines: Lines<R>,
    line_number: usize,
    skipped_types: HashSet<String>,
}

impl<R: BufRead> JsonLinesEventIterator<R> {
    /// Parse one non-empty line; `Ok(None)` for frame types that are skipped
    fn parse_line(&mut self, line: &str) -> Result<Option<BusEvent>> {
        let value: Value = serde_json::from_str(line).map_err(|e| self.parse_error(e))?;

        let frame_type = value
            .get("type")
            .and_then(Value::as_str)
            .ok_or_else(|| DecoderError::CaptureParse {
                line: self.line_number,
                message: "missing frame type".to_string(),
            })?;

        if !BusEvent::FRAME_TYPES.iter().any(|known| *known == frame_type) {
            if self.skipped_types.insert(frame_type.to_string()) {
                log::debug!("Skipping analyzer frame type '{}' (first seen on line {})", frame_type, self.line_number);
            }
            return Ok(None);
        }

        let event = serde_json::from_value(value).map_err(|e| self.parse_error(e))?;
        Ok(Some(event))
    }

    fn parse_error(&self, error: serde_json::Error) -> DecoderError {
        DecoderError::CaptureParse {
            line: self.line_number,
            message: error.to_string(),
        }
    }
}

impl<R: BufRead> Iterator for JsonLinesEventIterator<R> {
    type Item = Result<BusEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_number += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(DecoderError::CaptureParse {
                        line: self.line_number,
                        message: e.to_string(),
                    }))
                }
            };

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            match self.parse_line(trimmed) {
                Ok(Some(event)) => return Some(Ok(event)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl CaptureReader for JsonLinesEventIterator<BufReader<File>> {
    fn open(path: &Path) -> Result<Self> {
        JsonLinesReader::open(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_events_and_skips_other_frames() {
        let capture = r#"
{"type":"header_break","start_time":0.0,"end_time":0.5}
{"type":"header_sync","start_time":0.5,"end_time":1.0}
{"type":"header_pid","protected_id":36,"start_time":1.0,"end_time":1.5}

{"type":"data","data":1,"start_time":2.0,"end_time":2.5}
{"type":"data_or_checksum","data":254,"start_time":3.0,"end_time":3.5}
"#;
        let events: Vec<BusEvent> = JsonLinesReader::from_reader(Cursor::new(capture))
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(
            events,
            vec![
                BusEvent::Break { start_time: 0.0, end_time: 0.5 },
                BusEvent::ProtectedId { value: 36, start_time: 1.0, end_time: 1.5 },
                BusEvent::DataByte { value: 1, start_time: 2.0, end_time: 2.5 },
                BusEvent::DataByte { value: 254, start_time: 3.0, end_time: 3.5 },
            ]
        );
    }

    #[test]
    fn test_bad_line_reports_line_number_and_continues() {
        let capture = "{\"type\":\"header_break\",\"start_time\":0.0,\"end_time\":0.5}\nnot json\n{\"type\":\"data\",\"data\":300,\"start_time\":1.0,\"end_time\":1.5}\n{\"start_time\":2.0}\n{\"type\":\"data\",\"data\":7,\"start_time\":3.0,\"end_time\":3.5}\n";
        let results: Vec<_> = JsonLinesReader::from_reader(Cursor::new(capture)).collect();

        assert_eq!(results.len(), 5);
        assert!(results[0].is_ok());
        assert!(matches!(results[1], Err(DecoderError::CaptureParse { line: 2, .. })));
        // Data value out of byte range
        assert!(matches!(results[2], Err(DecoderError::CaptureParse { line: 3, .. })));
        assert!(matches!(results[3], Err(DecoderError::CaptureParse { line: 4, .. })));
        assert!(matches!(
            results[4],
            Ok(BusEvent::DataByte { value: 7, .. })
        ));
    }

    #[test]
    fn test_unreadable_line_keeps_line_numbers() {
        let mut capture = b"{\"type\":\"header_break\",\"start_time\":0.0,\"end_time\":0.5}\n".to_vec();
        capture.extend_from_slice(b"\xff\xfe garbage\n");
        capture.extend_from_slice(b"not json\n");
        let results: Vec<_> = JsonLinesReader::from_reader(Cursor::new(capture)).collect();

        assert_eq!(results.len(), 3);
        assert!(matches!(results[0], Ok(BusEvent::Break { .. })));
        // Invalid UTF-8
        assert!(matches!(results[1], Err(DecoderError::CaptureParse { line: 2, .. })));
        assert!(matches!(results[2], Err(DecoderError::CaptureParse { line: 3, .. })));
    }

    #[test]
    fn test_missing_file() {
        let result = JsonLinesReader::open(Path::new("does-not-exist.jsonl"));
        match result {
            Err(DecoderError::IoError(e)) => assert_eq!(e.kind(), std::io::ErrorKind::NotFound),
            Err(other) => panic!("expected an I/O error, got {:?}", other),
            Ok(_) => panic!("expected an error for a missing capture"),
        }
    }
}
