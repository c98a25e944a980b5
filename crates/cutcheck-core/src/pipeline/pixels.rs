//! Per-pixel grayscale / color / transparency classification.

use image::{GenericImageView, Rgba};

use crate::types::PixelTally;

/// Advisory attached to reports whose bitmap has color or transparency.
pub const FLATTEN_ADVISORY: &str = "Image contains color or transparent pixels. \
     It must be converted to grayscale and flattened before printing, \
     and may not print as intended.";

/// Counts mono, color, and transparent pixels in a bitmap.
///
/// A pixel is mono when every pairwise channel difference (R-G, G-B, B-R)
/// is within `tolerance`. Transparency (alpha below 255) is counted
/// independently of the mono/color split.
#[derive(Debug, Clone, Copy, Default)]
pub struct PixelClassifier {
    tolerance: u8,
}

impl PixelClassifier {
    pub fn new(tolerance: u8) -> Self {
        Self { tolerance }
    }

    #[inline]
    pub fn is_mono(&self, [r, g, b, _]: [u8; 4]) -> bool {
        r.abs_diff(g) <= self.tolerance
            && g.abs_diff(b) <= self.tolerance
            && b.abs_diff(r) <= self.tolerance
    }

    /// Scan every pixel exactly once.
    pub fn classify<I>(&self, image: &I) -> PixelTally
    where
        I: GenericImageView<Pixel = Rgba<u8>>,
    {
        let mut tally = PixelTally::default();
        for (_, _, Rgba(px)) in image.pixels() {
            if px[3] < 255 {
                tally.alpha += 1;
            }
            if self.is_mono(px) {
                tally.mono += 1;
            } else {
                tally.color += 1;
            }
        }
        tracing::debug!(
            mono = tally.mono,
            color = tally.color,
            alpha = tally.alpha,
            "pixel scan"
        );
        tally
    }

    /// The non-blocking flattening advisory, if the tally calls for one.
    pub fn advisory(tally: &PixelTally) -> Option<&'static str> {
        tally.needs_grayscale_flattening().then_some(FLATTEN_ADVISORY)
    }
}
