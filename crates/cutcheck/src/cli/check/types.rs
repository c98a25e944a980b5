//! CLI enum types for the check command.

use clap::ValueEnum;
use cutcheck_core::OutputFormat as CoreOutputFormat;

/// Supported output formats.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// Single JSON object or array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
}

impl OutputFormat {
    /// The library writer format, if this is a machine-readable format.
    pub fn core(self) -> Option<CoreOutputFormat> {
        match self {
            OutputFormat::Text => None,
            OutputFormat::Json => Some(CoreOutputFormat::Json),
            OutputFormat::Jsonl => Some(CoreOutputFormat::JsonLines),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Jsonl => write!(f, "jsonl"),
        }
    }
}
