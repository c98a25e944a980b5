//! Core data types for the submission check pipeline.
//!
//! These types describe the submission profile a file is checked against and
//! the report produced for each checked file.

use serde::{Deserialize, Serialize};

use crate::pipeline::state::PipelineState;

/// An exact pixel-size profile that submitted images must match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionSpec {
    /// Profile identifier (e.g., "MBF_SPACE1")
    pub id: String,

    /// Required width in pixels
    pub width: u32,

    /// Required height in pixels
    pub height: u32,
}

impl SubmissionSpec {
    pub fn new(id: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            id: id.into(),
            width,
            height,
        }
    }
}

/// The two container formats accepted for submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerKind {
    /// Flat raster image (PNG)
    Raster,
    /// Layered document (PSD)
    Layered,
}

impl ContainerKind {
    /// Map a lowercase file extension to a container kind.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "png" => Some(Self::Raster),
            "psd" => Some(Self::Layered),
            _ => None,
        }
    }
}

/// Color mode declared in a layered document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorMode {
    Bitmap,
    Grayscale,
    Indexed,
    Rgb,
    Cmyk,
    Hsl,
    Hsb,
    Multichannel,
    Duotone,
    Lab,
    Gray16,
    Rgb48,
    Lab48,
    Cmyk64,
    DeepMultichannel,
    Duotone16,
    Unknown(u16),
}

impl ColorMode {
    /// Decode the header's mode field.
    pub fn from_code(code: u16) -> Self {
        match code {
            0 => Self::Bitmap,
            1 => Self::Grayscale,
            2 => Self::Indexed,
            3 => Self::Rgb,
            4 => Self::Cmyk,
            5 => Self::Hsl,
            6 => Self::Hsb,
            7 => Self::Multichannel,
            8 => Self::Duotone,
            9 => Self::Lab,
            10 => Self::Gray16,
            11 => Self::Rgb48,
            12 => Self::Lab48,
            13 => Self::Cmyk64,
            14 => Self::DeepMultichannel,
            15 => Self::Duotone16,
            other => Self::Unknown(other),
        }
    }

    /// Display name of the mode, as shown to submitters.
    pub fn name(self) -> &'static str {
        match self {
            Self::Bitmap => "Bitmap",
            Self::Grayscale => "GrayScale",
            Self::Indexed => "IndexedColor",
            Self::Rgb => "RGBColor",
            Self::Cmyk => "CMYKColor",
            Self::Hsl => "HSLColor",
            Self::Hsb => "HSBColor",
            Self::Multichannel => "Multichannel",
            Self::Duotone => "Duotone",
            Self::Lab => "LabColor",
            Self::Gray16 => "Gray16",
            Self::Rgb48 => "RGB48",
            Self::Lab48 => "Lab48",
            Self::Cmyk64 => "CMYK64",
            Self::DeepMultichannel => "DeepMultichannel",
            Self::Duotone16 => "Duotone16",
            Self::Unknown(_) => "Unknown",
        }
    }
}

impl std::fmt::Display for ColorMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Verdict attached to a single report field.
///
/// Only `Error` blocks submission. `Neutral` fields are informational and
/// carry no verdict at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldStatus {
    Neutral,
    Ok,
    Warn,
    Error,
}

impl FieldStatus {
    pub fn is_blocking(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Which fact a report row describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    FileName,
    FileSize,
    Format,
    Image,
    ColorMode,
    Layers,
    Width,
    Height,
}

impl Field {
    /// Human-readable row label.
    pub fn label(self) -> &'static str {
        match self {
            Self::FileName => "File",
            Self::FileSize => "File size",
            Self::Format => "Format",
            Self::Image => "Image",
            Self::ColorMode => "Color mode",
            Self::Layers => "Layers",
            Self::Width => "Width",
            Self::Height => "Height",
        }
    }
}

/// One row of a validation report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldOutcome {
    /// The fact this row describes
    pub field: Field,

    /// Displayed value (e.g., "1654px", "RGBColor")
    pub value: String,

    /// Verdict for this row
    pub status: FieldStatus,

    /// Explanation shown next to the value, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl FieldOutcome {
    pub fn new(field: Field, value: impl Into<String>, status: FieldStatus) -> Self {
        Self {
            field,
            value: value.into(),
            status,
            note: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn label(&self) -> &'static str {
        self.field.label()
    }
}

/// Per-pixel classification counts for one scanned bitmap.
///
/// `mono + color` always equals the number of scanned pixels. `alpha` is
/// counted independently of the other two.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelTally {
    /// Pixels whose RGB channels are within tolerance of each other
    pub mono: u64,

    /// Pixels with at least one channel pair outside tolerance
    pub color: u64,

    /// Pixels that are not fully opaque
    pub alpha: u64,
}

impl PixelTally {
    /// Total number of scanned pixels.
    pub fn total(&self) -> u64 {
        self.mono + self.color
    }

    /// Whether the bitmap must be flattened to opaque grayscale before printing.
    pub fn needs_grayscale_flattening(&self) -> bool {
        self.color > 0 || self.alpha > 0
    }
}

/// The complete result of checking one submitted file.
///
/// Built once per file and never modified after it is returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Submitted file name
    pub file_name: String,

    /// Raw file size in bytes
    pub file_size: u64,

    /// Submission profile the file was checked against
    pub profile: String,

    /// Detected container, if the extension was supported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<ContainerKind>,

    /// Report rows in display order
    pub fields: Vec<FieldOutcome>,

    /// True iff at least one row has status `error`
    pub has_blocking_error: bool,

    /// Terminal pipeline state for this file
    pub state: PipelineState,

    /// Pixel classification result, if the bitmap was scanned
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tally: Option<PixelTally>,

    /// Non-blocking advisories (grayscale flattening, etc.)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub advisories: Vec<String>,

    /// BLAKE3 fingerprint of the raw bytes
    pub content_hash: String,

    /// Base64-encoded PNG preview of the scanned bitmap
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

impl ValidationReport {
    /// Whether the submission action may be enabled for this file.
    pub fn can_submit(&self) -> bool {
        self.state == PipelineState::ReportReady && !self.has_blocking_error
    }

    /// Find the first row describing `field`.
    pub fn field(&self, field: Field) -> Option<&FieldOutcome> {
        self.fields.iter().find(|f| f.field == field)
    }

    /// Rows with status `error`.
    pub fn errors(&self) -> impl Iterator<Item = &FieldOutcome> {
        self.fields.iter().filter(|f| f.status.is_blocking())
    }
}
