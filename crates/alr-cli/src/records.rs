//! JSON-lines input and NDJSON output.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use alr_core::BatchOutput;
use alr_model::AlrRecord;
use anyhow::{Context, Result};
use serde_json::error::Category;
use tracing::{debug, info};

/// Read one [`AlrRecord`] per non-blank line.
///
/// Parse errors name the line number only; the line itself may hold PHI.
pub fn read_records<R: BufRead>(reader: R) -> Result<Vec<AlrRecord>> {
    let mut records = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.with_context(|| format!("read line {line_no}"))?;
        if line.trim().is_empty() {
            continue;
        }
        let record: AlrRecord = serde_json::from_str(&line)
            .map_err(|error| anyhow::anyhow!(json_error_summary(&error)))
            .with_context(|| format!("line {line_no} is not a valid ALR record"))?;
        records.push(record);
    }
    debug!(records = records.len(), "records parsed");
    Ok(records)
}

pub fn load_records(path: &Path) -> Result<Vec<AlrRecord>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let records = read_records(BufReader::new(file))
        .with_context(|| format!("read records from {}", path.display()))?;
    info!(path = %path.display(), records = records.len(), "records loaded");
    Ok(records)
}

/// Write every resource line of a batch. Returns the number of lines written.
pub fn write_ndjson<W: Write>(writer: W, output: &BatchOutput) -> Result<usize> {
    let mut writer = BufWriter::new(writer);
    let mut lines = 0usize;
    for text in &output.texts {
        writeln!(writer, "{text}").context("write resource")?;
        lines += text.lines().count();
    }
    writer.flush().context("flush output")?;
    Ok(lines)
}

/// Error category and position, without the offending text.
fn json_error_summary(error: &serde_json::Error) -> String {
    let category = match error.classify() {
        Category::Io => "I/O error",
        Category::Syntax => "malformed JSON",
        Category::Data => "unexpected field type or missing field",
        Category::Eof => "truncated JSON",
    };
    format!("{category} at column {}", error.column())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_records_and_skips_blank_lines() {
        let input = concat!(
            r#"{"mbi":"1S00E00AA00","timestamp":"2021-03-01T00:00:00Z","fields":{"HCC_version":"V24"}}"#,
            "\n\n",
            r#"{"mbi":"2S00E00AA00","timestamp":"2021-03-01T00:00:00Z","sex":"1"}"#,
            "\n"
        );
        let records = read_records(input.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].field("HCC_version"), Some("V24"));
        assert_eq!(records[1].sex, "1");
    }

    #[test]
    fn parse_errors_name_the_line_without_its_content() {
        let input = concat!(
            r#"{"mbi":"1S00E00AA00","timestamp":"2021-03-01T00:00:00Z"}"#,
            "\n",
            r#"{"mbi":"SECRET-MBI","timestamp":"not a time"}"#,
            "\n"
        );
        let error = read_records(input.as_bytes()).unwrap_err();
        let message = format!("{error:#}");
        assert!(message.contains("line 2"), "{message}");
        assert!(!message.contains("SECRET-MBI"), "{message}");
        assert!(!message.contains("not a time"), "{message}");
    }

    #[test]
    fn writes_one_line_per_resource() {
        let output = BatchOutput {
            texts: vec!["{\"a\":1}".to_string(), "{\"b\":1}\n{\"c\":1}".to_string()],
            ..BatchOutput::default()
        };
        let mut buffer = Vec::new();
        let lines = write_ndjson(&mut buffer, &output).unwrap();
        assert_eq!(lines, 3);
        assert_eq!(
            String::from_utf8(buffer).unwrap(),
            "{\"a\":1}\n{\"b\":1}\n{\"c\":1}\n"
        );
    }
}
