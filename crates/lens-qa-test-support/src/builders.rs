//! Synthetic image builders for testing.

use std::path::Path;

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use lens_qa_core::domain::{ImageInfo, PixelBuffer};

/// Builder for creating synthetic test images.
///
/// Provides convenience methods for generating images with specific
/// characteristics (sharp, hazy, blurred, flat).
pub struct SyntheticImageBuilder;

impl SyntheticImageBuilder {
    // === Sharp/High-Contrast Images ===

    /// Creates a high-contrast checkerboard pattern (very sharp edges).
    ///
    /// Should score low: a clean lens on a crisp scene.
    #[must_use]
    pub fn checkerboard(width: u32, height: u32) -> ImageInfo {
        Self::checkerboard_with_cell_size(width, height, 8)
    }

    /// Creates a checkerboard with custom cell size.
    #[must_use]
    pub fn checkerboard_with_cell_size(width: u32, height: u32, cell_size: u32) -> ImageInfo {
        let cell = cell_size.max(1);
        let img = GrayImage::from_fn(width, height, |x, y| {
            if (x / cell + y / cell) % 2 == 0 {
                Luma([255u8])
            } else {
                Luma([0u8])
            }
        });
        ImageInfo::new("synthetic://checkerboard", DynamicImage::ImageLuma8(img))
    }

    // === Flat Images ===

    /// Creates a uniform gray image.
    #[must_use]
    pub fn uniform_gray(width: u32, height: u32, value: u8) -> ImageInfo {
        let img = GrayImage::from_pixel(width, height, Luma([value]));
        ImageInfo::new("synthetic://uniform_gray", DynamicImage::ImageLuma8(img))
    }

    /// Creates a uniform RGB image.
    #[must_use]
    pub fn uniform_rgb(width: u32, height: u32, rgb: [u8; 3]) -> ImageInfo {
        let img = RgbImage::from_pixel(width, height, Rgb(rgb));
        ImageInfo::new("synthetic://uniform_rgb", DynamicImage::ImageRgb8(img))
    }

    /// Creates a 1x1 pixel image (edge case).
    #[must_use]
    pub fn single_pixel(value: u8) -> ImageInfo {
        Self::uniform_gray(1, 1, value)
    }

    /// Creates a smooth horizontal gradient (soft edges everywhere).
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn horizontal_gradient(width: u32, height: u32) -> ImageInfo {
        let img = GrayImage::from_fn(width, height, |x, _| {
            let val = ((u32::from(u8::MAX) * x) / width.max(1)) as u8;
            Luma([val])
        });
        ImageInfo::new(
            "synthetic://horizontal_gradient",
            DynamicImage::ImageLuma8(img),
        )
    }

    // === Degraded Images ===

    /// Creates a checkerboard seen through a veil: each pixel is pushed
    /// `strength` of the way toward the `veil` gray level.
    ///
    /// With `strength = 0.75` and `veil = 180` the dark channel stays high
    /// and contrast collapses, the signature of a smudged lens.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn hazy(width: u32, height: u32, cell_size: u32, veil: u8, strength: f32) -> ImageInfo {
        let cell = cell_size.max(1);
        let strength = strength.clamp(0.0, 1.0);
        let img = GrayImage::from_fn(width, height, |x, y| {
            let scene = if (x / cell + y / cell) % 2 == 0 { 255.0 } else { 0.0 };
            let v = (1.0 - strength).mul_add(scene, strength * f32::from(veil));
            Luma([v.round().clamp(0.0, 255.0) as u8])
        });
        ImageInfo::new("synthetic://hazy", DynamicImage::ImageLuma8(img))
    }

    /// Returns a Gaussian-blurred copy of `source` (defocus).
    #[must_use]
    pub fn gaussian_blurred(source: &ImageInfo, sigma: f32) -> ImageInfo {
        let blurred = if sigma > 0.0 {
            source.image.blur(sigma)
        } else {
            source.image.clone()
        };
        ImageInfo::new(format!("{}#blur={sigma}", source.path), blurred)
    }
}

/// Convenience functions for common test images.
impl SyntheticImageBuilder {
    /// Returns a standard sharp test image (100x100 checkerboard, 2px cells).
    #[must_use]
    pub fn sharp_image() -> ImageInfo {
        Self::checkerboard_with_cell_size(100, 100, 2)
    }

    /// Returns a standard hazy test image (100x100, 75% veil at 180).
    #[must_use]
    pub fn hazy_image() -> ImageInfo {
        Self::hazy(100, 100, 8, 180, 0.75)
    }

    /// Returns a standard flat test image (100x100 mid-gray).
    #[must_use]
    pub fn flat_image() -> ImageInfo {
        Self::uniform_gray(100, 100, 128)
    }

    /// Converts an image to a pixel buffer without any rescaling.
    ///
    /// # Panics
    ///
    /// Panics if the image has a zero dimension.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn pixels(info: &ImageInfo) -> PixelBuffer {
        PixelBuffer::from_dynamic(&info.image).expect("synthetic image must not be empty")
    }

    /// Writes an image to `path`, format chosen from the extension.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save(info: &ImageInfo, path: &Path) -> anyhow::Result<()> {
        info.image.save(path)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkerboard_dimensions() {
        let img = SyntheticImageBuilder::checkerboard(100, 80);
        assert_eq!(img.width, 100);
        assert_eq!(img.height, 80);
        assert_eq!(img.path, "synthetic://checkerboard");
    }

    #[test]
    fn test_checkerboard_pattern() {
        let img = SyntheticImageBuilder::checkerboard_with_cell_size(16, 16, 8);
        let luma = img.image.to_luma8();

        // Top-left cell (0,0) should be white (255)
        assert_eq!(luma.get_pixel(0, 0).0[0], 255);
        // Next cell should be black (0)
        assert_eq!(luma.get_pixel(8, 0).0[0], 0);
    }

    #[test]
    fn test_uniform_rgb() {
        let img = SyntheticImageBuilder::uniform_rgb(10, 10, [255, 0, 128]);
        let rgb = img.image.to_rgb8();
        assert!(rgb.pixels().all(|p| p.0 == [255, 0, 128]));
    }

    #[test]
    fn test_hazy_levels() {
        let img = SyntheticImageBuilder::hazy(16, 16, 8, 180, 0.75);
        let luma = img.image.to_luma8();
        // 0.25 * 255 + 0.75 * 180 = 198.75
        assert_eq!(luma.get_pixel(0, 0).0[0], 199);
        // 0.75 * 180 = 135
        assert_eq!(luma.get_pixel(8, 0).0[0], 135);
    }

    #[test]
    fn test_gaussian_blur_softens_edges() {
        let sharp = SyntheticImageBuilder::checkerboard_with_cell_size(32, 32, 8);
        let blurred = SyntheticImageBuilder::gaussian_blurred(&sharp, 2.0);
        let luma = blurred.image.to_luma8();

        // Pixels next to a cell boundary move toward the middle.
        let near_edge = luma.get_pixel(7, 4).0[0];
        assert!(near_edge < 255 && near_edge > 0, "got {near_edge}");
        assert_eq!((blurred.width, blurred.height), (32, 32));
    }

    #[test]
    fn test_zero_sigma_is_identity() {
        let sharp = SyntheticImageBuilder::checkerboard(16, 16);
        let same = SyntheticImageBuilder::gaussian_blurred(&sharp, 0.0);
        assert_eq!(sharp.image.to_luma8(), same.image.to_luma8());
    }

    #[test]
    fn test_gradient_range() {
        let img = SyntheticImageBuilder::horizontal_gradient(256, 10);
        let luma = img.image.to_luma8();

        assert!(luma.get_pixel(0, 0).0[0] < 5);
        assert!(luma.get_pixel(255, 0).0[0] > 250);
    }

    #[test]
    fn test_single_pixel() {
        let img = SyntheticImageBuilder::single_pixel(42);
        assert_eq!((img.width, img.height), (1, 1));
        assert_eq!(SyntheticImageBuilder::pixels(&img).rgb(0, 0), [42, 42, 42]);
    }

    #[test]
    fn test_save_round_trips_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flat.png");
        SyntheticImageBuilder::save(&SyntheticImageBuilder::flat_image(), &path).unwrap();
        let loaded = image::open(&path).unwrap();
        assert_eq!((loaded.width(), loaded.height()), (100, 100));
    }
}
