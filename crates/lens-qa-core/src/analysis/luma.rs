//! Luma conversion shared by every luminance-based extractor.

use image::{GrayImage, Luma};

use crate::domain::PixelBuffer;

const R_WEIGHT: f32 = 0.299;
const G_WEIGHT: f32 = 0.587;
const B_WEIGHT: f32 = 0.114;

/// ITU-R BT.601 luma of one pixel, rounded to 0-255.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn luma_of(rgb: [u8; 3]) -> u8 {
    let [r, g, b] = rgb.map(f32::from);
    (R_WEIGHT * r + G_WEIGHT * g + B_WEIGHT * b)
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Read-only grid of 0-255 luma values derived once from a [`PixelBuffer`].
#[derive(Debug, Clone)]
pub struct LumaBuffer {
    image: GrayImage,
}

impl LumaBuffer {
    /// Converts every pixel of `pixels` to luma.
    #[must_use]
    pub fn from_pixels(pixels: &PixelBuffer) -> Self {
        let rgba = pixels.as_rgba();
        let image = GrayImage::from_fn(rgba.width(), rgba.height(), |x, y| {
            Luma([luma_of(pixels.rgb(x, y))])
        });
        Self { image }
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> usize {
        self.image.width() as usize
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> usize {
        self.image.height() as usize
    }

    /// Luma values in row-major order.
    #[must_use]
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    /// Luma at `(x, y)` as a signed integer, ready for convolution.
    #[inline]
    #[must_use]
    pub fn at(&self, x: usize, y: usize) -> i32 {
        i32::from(self.image.as_raw()[y * self.width() + x])
    }
}
