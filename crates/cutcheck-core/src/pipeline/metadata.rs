//! Color-mode and layer-count checks for layered documents.

use crate::pipeline::decode::LayeredInfo;
use crate::types::{ColorMode, Field, FieldOutcome, FieldStatus};

/// Facts read from a decoded layered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayeredMetadata {
    pub color_mode: ColorMode,
    pub layer_count: usize,
}

/// Derives report rows from layered-document metadata.
pub struct MetadataExtractor;

impl MetadataExtractor {
    /// Read the header's color mode and the layer tree's top-level length.
    pub fn extract(info: &LayeredInfo) -> LayeredMetadata {
        LayeredMetadata {
            color_mode: info.header.color_mode,
            layer_count: info.tree.len(),
        }
    }

    /// Grayscale is expected; RGB and CMYK print but are discouraged;
    /// every other mode blocks submission.
    pub fn color_mode_outcome(mode: ColorMode) -> FieldOutcome {
        let name = mode.name();
        match mode {
            ColorMode::Grayscale => FieldOutcome::new(Field::ColorMode, name, FieldStatus::Ok),
            ColorMode::Rgb | ColorMode::Cmyk => {
                FieldOutcome::new(Field::ColorMode, name, FieldStatus::Warn)
                    .with_note("will be converted to grayscale for print")
            }
            _ => FieldOutcome::new(Field::ColorMode, name, FieldStatus::Error)
                .with_note("unsupported color mode; save as grayscale"),
        }
    }

    /// Zero layers is a flattened document. More than one may print
    /// unexpectedly. Exactly one carries no verdict.
    pub fn layer_count_outcome(count: usize) -> FieldOutcome {
        match count {
            0 => FieldOutcome::new(Field::Layers, "0", FieldStatus::Ok)
                .with_note("flattened, no layer structure"),
            1 => FieldOutcome::new(Field::Layers, "1", FieldStatus::Neutral),
            n => FieldOutcome::new(Field::Layers, n.to_string(), FieldStatus::Warn)
                .with_note("multiple unflattened layers may print unexpectedly"),
        }
    }

    /// Both rows for a layered document, color mode first.
    pub fn outcomes(info: &LayeredInfo) -> [FieldOutcome; 2] {
        let meta = Self::extract(info);
        tracing::trace!(
            mode = info.header.color_mode_name(),
            layers = meta.layer_count,
            "layered metadata"
        );
        [
            Self::color_mode_outcome(meta.color_mode),
            Self::layer_count_outcome(meta.layer_count),
        ]
    }
}
