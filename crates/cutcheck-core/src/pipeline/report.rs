//! Aggregation of field outcomes into a [`ValidationReport`].

use crate::config::{LimitsConfig, ReportConfig};
use crate::pipeline::pixels::PixelClassifier;
use crate::pipeline::state::PipelineState;
use crate::types::{ContainerKind, Field, FieldOutcome, FieldStatus, PixelTally, ValidationReport};

const SIZE_UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

/// Human-readable size using 1024-based units.
///
/// The value is rounded to `decimals` places and trailing zeros are dropped,
/// so 52428800 bytes is "50 MB" and 1536 bytes is "1.5 KB".
pub fn format_bytes(bytes: u64, decimals: usize) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut scaled = bytes as f64;
    while scaled >= 1024.0 && unit < SIZE_UNITS.len() - 1 {
        scaled /= 1024.0;
        unit += 1;
    }

    let mut text = format!("{scaled:.decimals$}");
    if text.contains('.') {
        let trimmed = text.trim_end_matches('0').trim_end_matches('.').len();
        text.truncate(trimmed);
    }
    format!("{text} {}", SIZE_UNITS[unit])
}

/// Collects outcomes from each stage and emits them in display order.
///
/// Rows may be supplied in any order; [`build`](Self::build) always lays
/// them out as file name, file size, format, decode failure, color mode,
/// layers, width, height.
#[derive(Debug, Clone)]
pub struct ReportBuilder {
    file_name: String,
    file_size: u64,
    profile: String,
    max_file_size: u64,
    size_decimals: usize,
    container: Option<ContainerKind>,
    format: Option<FieldOutcome>,
    decode_failure: Option<FieldOutcome>,
    metadata: Vec<FieldOutcome>,
    dimensions: Vec<FieldOutcome>,
    tally: Option<PixelTally>,
    advisories: Vec<String>,
    content_hash: String,
    preview: Option<String>,
}

impl ReportBuilder {
    pub fn new(file_name: impl Into<String>, file_size: u64, profile: impl Into<String>) -> Self {
        let defaults = LimitsConfig::default();
        Self {
            file_name: file_name.into(),
            file_size,
            profile: profile.into(),
            max_file_size: defaults.max_file_size_bytes,
            size_decimals: ReportConfig::default().size_decimals,
            container: None,
            format: None,
            decode_failure: None,
            metadata: Vec::new(),
            dimensions: Vec::new(),
            tally: None,
            advisories: Vec::new(),
            content_hash: String::new(),
            preview: None,
        }
    }

    /// Apply the size limit and size formatting settings.
    pub fn with_config(mut self, limits: &LimitsConfig, report: &ReportConfig) -> Self {
        self.max_file_size = limits.max_file_size_bytes;
        self.size_decimals = report.size_decimals;
        self
    }

    pub fn content_hash(&mut self, hash: String) -> &mut Self {
        self.content_hash = hash;
        self
    }

    pub fn format(&mut self, container: Option<ContainerKind>, outcome: FieldOutcome) -> &mut Self {
        self.container = container;
        self.format = Some(outcome);
        self
    }

    pub fn decode_failure(&mut self, message: &str) -> &mut Self {
        tracing::debug!(file = %self.file_name, message, "decode failed");
        self.decode_failure = Some(
            FieldOutcome::new(Field::Image, "failed to decode image", FieldStatus::Error)
                .with_note(message),
        );
        self
    }

    pub fn metadata(&mut self, outcomes: impl IntoIterator<Item = FieldOutcome>) -> &mut Self {
        self.metadata.extend(outcomes);
        self
    }

    pub fn dimensions(&mut self, outcomes: impl IntoIterator<Item = FieldOutcome>) -> &mut Self {
        self.dimensions.extend(outcomes);
        self
    }

    /// Record the pixel scan and attach the flattening advisory if needed.
    pub fn tally(&mut self, tally: PixelTally) -> &mut Self {
        if let Some(advisory) = PixelClassifier::advisory(&tally) {
            self.advisories.push(advisory.to_string());
        }
        self.tally = Some(tally);
        self
    }

    pub fn preview(&mut self, preview: Option<String>) -> &mut Self {
        self.preview = preview;
        self
    }

    fn file_name_outcome(&self) -> FieldOutcome {
        FieldOutcome::new(Field::FileName, self.file_name.clone(), FieldStatus::Neutral)
    }

    /// Oversized files are flagged but never block submission.
    fn file_size_outcome(&self) -> FieldOutcome {
        let value = format_bytes(self.file_size, self.size_decimals);
        if self.file_size > self.max_file_size {
            FieldOutcome::new(Field::FileSize, value, FieldStatus::Warn).with_note(format!(
                "exceeds the {} limit",
                format_bytes(self.max_file_size, self.size_decimals)
            ))
        } else {
            FieldOutcome::new(Field::FileSize, value, FieldStatus::Neutral)
        }
    }

    /// Assemble the report for a pipeline that ended in `state`.
    pub fn build(&self, state: PipelineState) -> ValidationReport {
        let mut fields = vec![self.file_name_outcome(), self.file_size_outcome()];
        fields.extend(self.format.iter().cloned());
        fields.extend(self.decode_failure.iter().cloned());
        fields.extend(self.metadata.iter().cloned());
        fields.extend(self.dimensions.iter().cloned());

        let has_blocking_error = fields.iter().any(|f| f.status.is_blocking());

        ValidationReport {
            file_name: self.file_name.clone(),
            file_size: self.file_size,
            profile: self.profile.clone(),
            container: self.container,
            fields,
            has_blocking_error,
            state,
            tally: self.tally,
            advisories: self.advisories.clone(),
            content_hash: self.content_hash.clone(),
            preview: self.preview.clone(),
        }
    }
}
