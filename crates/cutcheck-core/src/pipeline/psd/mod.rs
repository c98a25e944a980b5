//! Reader for the layered Photoshop document container (version 1).
//!
//! File layout:
//!
//! ```text
//! header (26 bytes) | color mode data | image resources | layer & mask info | merged image
//! ```
//!
//! Every section after the header is length-prefixed except the merged image,
//! which runs to the end of the file.

mod composite;
mod cursor;
mod records;

#[cfg(test)]
pub(crate) mod test_support;

use async_trait::async_trait;

use crate::config::LimitsConfig;
use crate::error::{PipelineError, PsdError};
use crate::pipeline::cancel::CancelToken;
use crate::pipeline::decode::{LayeredDecoder, LayeredDocument, LayeredHeader};
use crate::types::ColorMode;

use cursor::Cursor;

/// Allocation guards checked against the header before any pixel data is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PsdLimits {
    pub max_dimension: u32,
    pub max_alloc_bytes: u64,
}

impl From<&LimitsConfig> for PsdLimits {
    fn from(limits: &LimitsConfig) -> Self {
        Self {
            max_dimension: limits.max_image_dimension,
            max_alloc_bytes: limits.max_alloc_bytes,
        }
    }
}

impl Default for PsdLimits {
    fn default() -> Self {
        Self::from(&LimitsConfig::default())
    }
}

/// Fixed-size document header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PsdHeader {
    pub channels: u16,
    pub height: u32,
    pub width: u32,
    pub depth: u16,
    pub mode_code: u16,
    pub color_mode: ColorMode,
}

impl PsdHeader {
    fn read(cur: &mut Cursor<'_>) -> Result<Self, PsdError> {
        if &cur.array::<4>()? != b"8BPS" {
            return Err(PsdError::BadSignature);
        }
        let version = cur.u16()?;
        if version != 1 {
            return Err(PsdError::UnsupportedVersion(version));
        }
        cur.skip(6)?;
        let channels = cur.u16()?;
        let height = cur.u32()?;
        let width = cur.u32()?;
        let depth = cur.u16()?;
        let mode_code = cur.u16()?;

        if !(1..=56).contains(&channels) {
            return Err(PsdError::InvalidChannelCount {
                channels,
                mode: mode_code,
            });
        }
        if !matches!(depth, 1 | 8 | 16 | 32) {
            return Err(PsdError::UnsupportedDepth(depth));
        }

        Ok(Self {
            channels,
            height,
            width,
            depth,
            mode_code,
            color_mode: ColorMode::from_code(mode_code),
        })
    }
}

/// Parse a complete document, stopping early if `cancel` trips.
pub fn parse(
    bytes: &[u8],
    limits: &PsdLimits,
    cancel: &CancelToken,
) -> Result<LayeredDocument, PsdError> {
    let mut cur = Cursor::new(bytes, "header");
    let header = PsdHeader::read(&mut cur)?;

    let max = limits.max_dimension;
    if header.width == 0 || header.height == 0 || header.width > max || header.height > max {
        return Err(PsdError::TooLarge {
            width: header.width,
            height: header.height,
            max,
        });
    }
    let needed = composite::buffer_bytes(&header)?;
    if needed > limits.max_alloc_bytes {
        return Err(PsdError::OverBudget {
            needed,
            limit: limits.max_alloc_bytes,
        });
    }

    let palette = cur.section("color mode data")?.rest();
    cur.section("image resources")?;
    let layer_section = cur.section("layer and mask info")?;
    let tree = records::read_layer_tree(layer_section, cancel)?;

    let image_data = Cursor::new(cur.rest(), "image data");
    let flattened = composite::read_composite(image_data, &header, palette, cancel)?;

    tracing::debug!(
        width = header.width,
        height = header.height,
        depth = header.depth,
        mode = %header.color_mode,
        layers = tree.len(),
        "parsed layered document"
    );

    Ok(LayeredDocument {
        header: LayeredHeader {
            cols: header.width,
            rows: header.height,
            color_mode: header.color_mode,
        },
        flattened,
        tree,
    })
}

/// Built-in layered-document decoder.
///
/// Parsing runs on the blocking pool and checks the cancel token between
/// rows, so an expired deadline releases the partially decoded buffers.
#[derive(Debug, Clone, Default)]
pub struct PsdDecoder {
    limits: PsdLimits,
}

impl PsdDecoder {
    pub fn new(limits: PsdLimits) -> Self {
        Self { limits }
    }
}

#[async_trait]
impl LayeredDecoder for PsdDecoder {
    async fn decode(
        &self,
        file: &str,
        bytes: std::sync::Arc<[u8]>,
        cancel: CancelToken,
    ) -> Result<LayeredDocument, PipelineError> {
        let limits = self.limits;
        let result = tokio::task::spawn_blocking(move || parse(&bytes, &limits, &cancel)).await;

        match result {
            Ok(Ok(doc)) => Ok(doc),
            Ok(Err(PsdError::Cancelled)) => Err(PipelineError::Cancelled {
                file: file.to_string(),
            }),
            Ok(Err(e)) => Err(PipelineError::Decode {
                file: file.to_string(),
                message: e.to_string(),
            }),
            Err(e) => Err(PipelineError::Decode {
                file: file.to_string(),
                message: format!("Task join error: {}", e),
            }),
        }
    }
}
