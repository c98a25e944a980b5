//! Machine-readable report output.
//!
//! JSON Lines output streams one report per line as each file finishes. JSON
//! output holds reports until [`ReportWriter::finish`], then writes a single
//! object for a one-file run or an array otherwise. The human-readable layout
//! lives in the CLI, which owns terminal styling.

use std::io::{self, Write};

use crate::types::ValidationReport;

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

/// Serializes validation reports in a machine-readable format.
pub struct ReportWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
    pending: Vec<ValidationReport>,
}

impl<W: Write> ReportWriter<W> {
    /// `pretty` only affects JSON; JSON Lines is always compact.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
            pending: Vec::new(),
        }
    }

    /// Emit a finished report, or hold it for `finish` when writing JSON.
    pub fn push(&mut self, report: &ValidationReport) -> io::Result<()> {
        match self.format {
            OutputFormat::JsonLines => {
                serde_json::to_writer(&mut self.writer, report).map_err(io::Error::other)?;
                writeln!(self.writer)
            }
            OutputFormat::Json => {
                self.pending.push(report.clone());
                Ok(())
            }
        }
    }

    /// Write any held reports and flush.
    pub fn finish(mut self) -> io::Result<W> {
        let pending = std::mem::take(&mut self.pending);
        if self.format == OutputFormat::Json && !pending.is_empty() {
            match pending.as_slice() {
                [single] => self.write_json(single)?,
                all => self.write_json(all)?,
            }
        }
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_json<T: serde::Serialize + ?Sized>(&mut self, value: &T) -> io::Result<()> {
        if self.pretty {
            serde_json::to_writer_pretty(&mut self.writer, value).map_err(io::Error::other)?;
        } else {
            serde_json::to_writer(&mut self.writer, value).map_err(io::Error::other)?;
        }
        writeln!(self.writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{PipelineState, ReportBuilder};

    fn report(name: &str) -> ValidationReport {
        ReportBuilder::new(name, 2048, "MBF_SPACE1").build(PipelineState::RejectedFormat)
    }

    #[test]
    fn test_single_report_is_one_object() {
        let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Json, false);
        writer.push(&report("a.gif")).unwrap();
        let output = String::from_utf8(writer.finish().unwrap()).unwrap();

        assert!(output.starts_with('{'));
        assert!(output.contains("\"file_name\":\"a.gif\""));
        assert!(output.contains("\"state\":\"rejected_format\""));
        assert!(output.contains("\"value\":\"2 KB\""));
    }

    #[test]
    fn test_jsonl_streams_before_finish() {
        let mut buffer = Vec::new();
        {
            let mut writer = ReportWriter::new(&mut buffer, OutputFormat::JsonLines, true);
            writer.push(&report("a.gif")).unwrap();
            writer.push(&report("b.gif")).unwrap();
        }

        let output = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        let parsed: ValidationReport = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.file_name, "b.gif");
    }

    #[test]
    fn test_batch_is_json_array() {
        let mut writer = ReportWriter::new(Vec::new(), OutputFormat::Json, true);
        writer.push(&report("a.gif")).unwrap();
        writer.push(&report("b.gif")).unwrap();
        let output = String::from_utf8(writer.finish().unwrap()).unwrap();

        assert!(output.starts_with('['));
        let parsed: Vec<ValidationReport> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_empty_json_run_writes_nothing() {
        let writer = ReportWriter::new(Vec::new(), OutputFormat::Json, true);
        assert!(writer.finish().unwrap().is_empty());
    }
}
