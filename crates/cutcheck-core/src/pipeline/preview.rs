//! Preview rendering of the classified bitmap.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use image::{imageops::FilterType, ImageFormat, RgbaImage};
use std::io::Cursor;

use crate::config::PreviewConfig;

/// Renders the scanned bitmap as a small base64 PNG.
pub struct PreviewRenderer {
    config: PreviewConfig,
}

impl PreviewRenderer {
    pub fn new(config: PreviewConfig) -> Self {
        Self { config }
    }

    /// Encode a preview whose longest edge is at most `config.size`.
    ///
    /// Returns `None` if previews are disabled or encoding fails.
    pub fn render(&self, pixels: &RgbaImage) -> Option<String> {
        let bytes = self.render_bytes(pixels)?;
        Some(BASE64.encode(bytes))
    }

    /// Same as [`render`](Self::render) but returns raw PNG bytes.
    pub fn render_bytes(&self, pixels: &RgbaImage) -> Option<Vec<u8>> {
        if !self.config.enabled {
            return None;
        }

        let (w, h) = pixels.dimensions();
        let size = self.config.size;
        let mut buffer = Cursor::new(Vec::new());
        let result = if w <= size && h <= size {
            pixels.write_to(&mut buffer, ImageFormat::Png)
        } else {
            let (tw, th) = fit_within(w, h, size);
            image::imageops::resize(pixels, tw, th, FilterType::Triangle)
                .write_to(&mut buffer, ImageFormat::Png)
        };

        match result {
            Ok(()) => Some(buffer.into_inner()),
            Err(e) => {
                tracing::debug!(error = %e, "preview encoding failed");
                None
            }
        }
    }
}

/// Scale so the longest edge equals `size`, keeping at least one pixel per axis.
fn fit_within(width: u32, height: u32, size: u32) -> (u32, u32) {
    let scale = |edge: u32, longest: u32| -> u32 {
        ((u64::from(edge) * u64::from(size)) / u64::from(longest)).max(1) as u32
    };
    if width >= height {
        (size, scale(height, width))
    } else {
        (scale(width, height), size)
    }
}
