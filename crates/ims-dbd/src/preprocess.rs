//! Physical-record preprocessing — sequence stripping and continuation
//! stitching.
//!
//! DBD source uses the 80-column macro statement format:
//! - **Columns 0-71**: statement payload
//! - **Column 71**: continuation marker (`*` = statement continues)
//! - **Columns 72-79**: sequence/identification field (dropped)
//! - Continuation records resume at **column 14**
//!
//! The lexer enforces the same column contract directly over the raw
//! text; this stage provides the logical-line view of it, one complete
//! macro statement per entry.

use thiserror::Error;

/// Length of a DBD physical record.
pub const RECORD_LEN: usize = 80;
/// First column of the sequence/identification tail.
pub const PAYLOAD_END: usize = 72;
/// Column where continuation content resumes on the following record.
pub const RESUME_COLUMN: usize = 14;

/// Record-format error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreprocessError {
    #[error("line {line}: record is {length} characters, expected 80")]
    MalformedRecordLength { line: usize, length: usize },
    #[error("line {line}: continuation marker with no following record")]
    MissingContinuation { line: usize },
}

/// One complete macro statement after continuation joining.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalLine {
    /// 1-based physical line the statement started on.
    pub number: usize,
    /// Joined statement text, sequence tail stripped, right-trimmed.
    pub text: String,
}

/// Split raw source into logical lines, validating the record format.
pub fn logical_lines(source: &str) -> Result<Vec<LogicalLine>, PreprocessError> {
    let records: Vec<&str> = source.lines().collect();
    let mut out = Vec::new();
    let mut i = 0;

    while i < records.len() {
        let number = i + 1;
        let mut payload = record_payload(records[i], number)?;
        let mut text = String::new();

        // A `*` in column 71 continues the statement onto the next
        // record, resuming at column 14.
        while payload.ends_with('*') {
            let marker_line = i + 1;
            text.push_str(payload[..payload.len() - 1].trim_end());
            i += 1;
            let next = match records.get(i) {
                Some(next) => next,
                None => return Err(PreprocessError::MissingContinuation { line: marker_line }),
            };
            payload = &record_payload(next, i + 1)?[RESUME_COLUMN..];
        }
        text.push_str(payload.trim_end());

        out.push(LogicalLine { number, text });
        i += 1;
    }

    Ok(out)
}

/// Validate one physical record and return its 72-column payload.
fn record_payload(record: &str, line: usize) -> Result<&str, PreprocessError> {
    if record.len() != RECORD_LEN {
        return Err(PreprocessError::MalformedRecordLength {
            line,
            length: record.len(),
        });
    }
    Ok(&record[..PAYLOAD_END])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// Pad `content` into a full 80-column record with a sequence number.
    fn record(content: &str) -> String {
        format!("{:<72}{}\n", content, "00000010")
    }

    /// Same, with a continuation marker in column 71.
    fn continued(content: &str) -> String {
        format!("{:<71}*{}\n", content, "00000020")
    }

    #[test]
    fn test_single_statement() {
        let src = record("         SEGM  NAME=WARD,BYTES=31");
        let lines = logical_lines(&src).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[0].text, "         SEGM  NAME=WARD,BYTES=31");
    }

    #[test]
    fn test_sequence_tail_dropped() {
        let src = record("         DATASET DD1=HOSPITAL");
        let lines = logical_lines(&src).unwrap();
        assert!(!lines[0].text.contains("00000010"));
    }

    #[test]
    fn test_record_length_boundary() {
        // 80 columns succeeds; 79 and 81 both fail.
        assert!(logical_lines(&format!("{:<80}\n", "A")).is_ok());

        let err = logical_lines(&format!("{:<79}\n", "A")).unwrap_err();
        assert_eq!(
            err,
            PreprocessError::MalformedRecordLength { line: 1, length: 79 }
        );

        let err = logical_lines(&format!("{:<81}\n", "A")).unwrap_err();
        assert_eq!(
            err,
            PreprocessError::MalformedRecordLength { line: 1, length: 81 }
        );
    }

    #[test]
    fn test_continuation_join() {
        let src = format!(
            "{}{}",
            continued("         SEGM  NAME=PATIENT,PARENT=HOSPITAL,"),
            record(&format!("{:14}BYTES=125", "")),
        );
        let lines = logical_lines(&src).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].text,
            "         SEGM  NAME=PATIENT,PARENT=HOSPITAL,BYTES=125"
        );
    }

    #[test]
    fn test_chained_continuation() {
        let src = format!(
            "{}{}{}",
            continued("         SEGM  NAME=PATIENT,"),
            continued(&format!("{:14}PARENT=HOSPITAL,", "")),
            record(&format!("{:14}BYTES=125", "")),
        );
        let lines = logical_lines(&src).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].text,
            "         SEGM  NAME=PATIENT,PARENT=HOSPITAL,BYTES=125"
        );
    }

    #[test]
    fn test_missing_continuation() {
        let src = continued("         SEGM  NAME=PATIENT,");
        let err = logical_lines(&src).unwrap_err();
        assert_eq!(err, PreprocessError::MissingContinuation { line: 1 });
    }

    #[test]
    fn test_bad_record_inside_continuation() {
        let src = format!(
            "{}{}",
            continued("         SEGM  NAME=PATIENT,"),
            "short\n"
        );
        let err = logical_lines(&src).unwrap_err();
        assert_eq!(
            err,
            PreprocessError::MalformedRecordLength { line: 2, length: 5 }
        );
    }

    #[test]
    fn test_statement_numbering() {
        let src = format!(
            "{}{}{}",
            record("         SEGM  NAME=A"),
            continued("         SEGM  NAME=B,"),
            record(&format!("{:14}BYTES=10", "")),
        );
        let lines = logical_lines(&src).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].number, 1);
        assert_eq!(lines[1].number, 2);
    }
}
