//! Error types for the submission check pipeline.
//!
//! Most validation findings are not errors at all: they are recorded as
//! [`FieldOutcome`](crate::types::FieldOutcome) entries inside a report. The
//! types here cover configuration problems, I/O, and the few pipeline
//! conditions that terminate a run without producing a report.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for cutcheck operations.
#[derive(Error, Debug)]
pub enum CutcheckError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Pipeline processing errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// The container bytes could not be decoded
    #[error("Decode error for {file}: {message}")]
    Decode { file: String, message: String },

    /// The layered-document decoder did not finish before its deadline
    #[error("Layered document {file} did not finish decoding within {timeout_ms}ms")]
    DecodeTimeout { file: String, timeout_ms: u64 },

    /// The decode was cancelled before it finished
    #[error("Decode of {file} was cancelled")]
    Cancelled { file: String },

    /// Extension is not one of the supported containers
    #[error("Unsupported format for {file}: {extension:?}")]
    UnsupportedFormat { file: String, extension: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// The file exists but could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the layered-document (PSD) reader.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PsdError {
    #[error("missing 8BPS signature")]
    BadSignature,

    #[error("unsupported document version {0}")]
    UnsupportedVersion(u16),

    #[error("unexpected end of data in {section}")]
    UnexpectedEof { section: &'static str },

    #[error("unsupported bit depth {0}")]
    UnsupportedDepth(u16),

    #[error("unsupported compression method {0}")]
    UnsupportedCompression(u16),

    #[error("invalid channel count {channels} for color mode {mode}")]
    InvalidChannelCount { channels: u16, mode: u16 },

    #[error("document dimensions {width}x{height} exceed the limit of {max}")]
    TooLarge { width: u32, height: u32, max: u32 },

    #[error("decoding needs {needed} bytes, over the {limit} byte budget")]
    OverBudget { needed: u64, limit: u64 },

    #[error("malformed run-length data")]
    BadRunLength,

    #[error("decode cancelled")]
    Cancelled,
}

/// Convenience type alias for cutcheck results.
pub type Result<T> = std::result::Result<T, CutcheckError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
