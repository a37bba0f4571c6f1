//! Owned pixel buffer handed to the scoring pipeline.

use image::{DynamicImage, Rgba, RgbaImage};

use crate::error::AnalysisError;

/// Immutable grid of 8-bit alpha/red/green/blue pixels, row-major.
///
/// Width and height are always at least 1.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    image: RgbaImage,
}

impl PixelBuffer {
    /// Wraps an RGBA image.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Decode`] if either dimension is zero.
    pub fn from_rgba(image: RgbaImage) -> Result<Self, AnalysisError> {
        if image.width() == 0 || image.height() == 0 {
            return Err(AnalysisError::decode(
                "",
                format!("zero-sized image {}x{}", image.width(), image.height()),
            ));
        }
        Ok(Self { image })
    }

    /// Converts any decoded image into a pixel buffer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Decode`] if either dimension is zero.
    pub fn from_dynamic(image: &DynamicImage) -> Result<Self, AnalysisError> {
        Self::from_rgba(image.to_rgba8())
    }

    /// Builds a buffer from packed `0xAARRGGBB` words, the layout host
    /// bitmaps hand out.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Argument`] if `pixels.len()` does not match
    /// `width * height`, or [`AnalysisError::Decode`] for zero dimensions.
    pub fn from_argb(width: u32, height: u32, pixels: &[u32]) -> Result<Self, AnalysisError> {
        let expected = width as usize * height as usize;
        if pixels.len() != expected {
            return Err(AnalysisError::Argument(format!(
                "expected {expected} pixels for {width}x{height}, got {}",
                pixels.len()
            )));
        }
        let mut image = RgbaImage::new(width, height);
        for (dst, &argb) in image.pixels_mut().zip(pixels) {
            let [a, r, g, b] = argb.to_be_bytes();
            *dst = Rgba([r, g, b, a]);
        }
        Self::from_rgba(image)
    }

    /// Width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    /// Height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Total number of pixels.
    #[must_use]
    pub fn pixel_count(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Red, green and blue channels at `(x, y)`.
    #[must_use]
    pub fn rgb(&self, x: u32, y: u32) -> [u8; 3] {
        let [r, g, b, _] = self.image.get_pixel(x, y).0;
        [r, g, b]
    }

    /// Red, green and blue channels of the pixel at row-major `index`.
    #[must_use]
    pub fn rgb_at(&self, index: usize) -> [u8; 3] {
        let raw = self.image.as_raw();
        let base = index * 4;
        [raw[base], raw[base + 1], raw[base + 2]]
    }

    /// Iterates over the red, green and blue channels of every pixel.
    pub fn rgb_pixels(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.image.pixels().map(|p| [p.0[0], p.0[1], p.0[2]])
    }

    /// Borrows the underlying RGBA image.
    #[must_use]
    pub const fn as_rgba(&self) -> &RgbaImage {
        &self.image
    }
}
