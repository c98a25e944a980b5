//! Container decoding into a common RGBA bitmap.
//!
//! Raster files are decoded with the `image` crate and fail synchronously.
//! Layered documents go through a [`LayeredDecoder`] under a deadline, since a
//! layered decoder may stall instead of reporting an error.

use async_trait::async_trait;
use image::{ImageFormat, ImageReader, Limits, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

use crate::config::LimitsConfig;
use crate::error::PipelineError;
use crate::pipeline::cancel::{CancelToken, DecodeDeadline};
use crate::pipeline::layers::LayerTree;
use crate::pipeline::psd::{PsdDecoder, PsdLimits};
use crate::types::{ColorMode, ContainerKind};

/// Header facts of a layered document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayeredHeader {
    /// Width in pixels
    pub cols: u32,
    /// Height in pixels
    pub rows: u32,
    pub color_mode: ColorMode,
}

impl LayeredHeader {
    pub fn color_mode_name(&self) -> &'static str {
        self.color_mode.name()
    }
}

/// Everything a layered decoder hands back.
#[derive(Debug, Clone)]
pub struct LayeredDocument {
    pub header: LayeredHeader,
    /// Merged image, used for the pixel scan
    pub flattened: RgbaImage,
    pub tree: LayerTree,
}

/// A decoding capability for layered documents.
///
/// Implementations should poll `cancel` while they work and stop once it
/// trips; the caller has already given up on the result by then.
#[async_trait]
pub trait LayeredDecoder: Send + Sync {
    async fn decode(
        &self,
        file: &str,
        bytes: Arc<[u8]>,
        cancel: CancelToken,
    ) -> Result<LayeredDocument, PipelineError>;
}

/// Layered-only facts carried alongside the bitmap.
#[derive(Debug, Clone)]
pub struct LayeredInfo {
    pub header: LayeredHeader,
    pub tree: LayerTree,
}

/// Result of decoding either container.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Full bitmap (the merged image for layered documents)
    pub pixels: RgbaImage,
    /// Present only for layered documents
    pub layered: Option<LayeredInfo>,
}

impl DecodedImage {
    pub fn from_raster(pixels: RgbaImage) -> Self {
        let (width, height) = pixels.dimensions();
        Self {
            width,
            height,
            pixels,
            layered: None,
        }
    }

    pub fn from_layered(doc: LayeredDocument) -> Self {
        Self {
            width: doc.header.cols,
            height: doc.header.rows,
            pixels: doc.flattened,
            layered: Some(LayeredInfo {
                header: doc.header,
                tree: doc.tree,
            }),
        }
    }

    pub fn color_mode(&self) -> Option<ColorMode> {
        self.layered.as_ref().map(|l| l.header.color_mode)
    }

    pub fn layer_count(&self) -> Option<usize> {
        self.layered.as_ref().map(|l| l.tree.len())
    }
}

/// Decodes PNG bytes on the blocking pool.
///
/// Images whose decoded buffer would exceed `max_alloc_bytes` fail with a
/// limits error instead of allocating.
#[derive(Debug, Clone)]
pub struct RasterDecoder {
    max_alloc_bytes: u64,
}

impl RasterDecoder {
    pub fn new(max_alloc_bytes: u64) -> Self {
        Self { max_alloc_bytes }
    }

    pub async fn decode(&self, file: &str, bytes: Arc<[u8]>) -> Result<DecodedImage, PipelineError> {
        let mut limits = Limits::default();
        limits.max_alloc = Some(self.max_alloc_bytes);
        let result = tokio::task::spawn_blocking(move || {
            let mut reader = ImageReader::with_format(Cursor::new(&bytes[..]), ImageFormat::Png);
            reader.limits(limits);
            reader.decode().map(|img| img.to_rgba8())
        })
        .await;

        match result {
            Ok(Ok(pixels)) => Ok(DecodedImage::from_raster(pixels)),
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

/// Picks the decoder for a container and applies the layered deadline.
pub struct ContainerDecoder {
    raster: RasterDecoder,
    layered: Arc<dyn LayeredDecoder>,
    layered_timeout: Duration,
}

impl ContainerDecoder {
    /// Decoder using the built-in layered-document reader.
    pub fn new(limits: &LimitsConfig) -> Self {
        Self::with_layered_decoder(limits, Arc::new(PsdDecoder::new(PsdLimits::from(limits))))
    }

    /// Decoder using a caller-supplied layered-document capability.
    pub fn with_layered_decoder(limits: &LimitsConfig, layered: Arc<dyn LayeredDecoder>) -> Self {
        Self {
            raster: RasterDecoder::new(limits.max_alloc_bytes),
            layered,
            layered_timeout: Duration::from_millis(limits.layered_decode_timeout_ms),
        }
    }

    pub async fn decode(
        &self,
        kind: ContainerKind,
        file: &str,
        bytes: Arc<[u8]>,
    ) -> Result<DecodedImage, PipelineError> {
        match kind {
            ContainerKind::Raster => self.raster.decode(file, bytes).await,
            ContainerKind::Layered => self.decode_layered(file, bytes).await,
        }
    }

    async fn decode_layered(&self, file: &str, bytes: Arc<[u8]>) -> Result<DecodedImage, PipelineError> {
        let deadline = DecodeDeadline::after(self.layered_timeout);
        let decode = self.layered.decode(file, bytes, deadline.token());

        match deadline.run(decode).await {
            Ok(Ok(doc)) => Ok(DecodedImage::from_layered(doc)),
            Ok(Err(e)) => Err(e),
            Err(expired) => {
                let timeout_ms = expired.timeout.as_millis() as u64;
                tracing::warn!(file, timeout_ms, "layered decode timed out");
                Err(PipelineError::DecodeTimeout {
                    file: file.to_string(),
                    timeout_ms,
                })
            }
        }
    }
}
