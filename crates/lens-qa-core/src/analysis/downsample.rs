//! Resolution policy: power-of-two subsampling at decode time, then a fixed
//! scale down to the working resolution every extractor is tuned against.

use std::borrow::Cow;

use image::imageops::{self, FilterType};
use image::{DynamicImage, RgbaImage};
use tracing::debug;

use crate::domain::PixelBuffer;
use crate::error::AnalysisError;

/// Default decode bound (both dimensions).
pub const DEFAULT_MAX_DIMENSION: u32 = 640;

/// Default scale from decoded size to working resolution.
pub const DEFAULT_WORKING_SCALE: f32 = 0.2;

/// Power-of-two subsample factor for decoding a `src_w` x `src_h` image
/// against a `max_w` x `max_h` bound.
///
/// The factor doubles while half the source, divided by the factor, still
/// covers the bound in both dimensions, so the decoded image never drops
/// below the bound.
#[must_use]
pub fn sample_factor(src_w: u32, src_h: u32, max_w: u32, max_h: u32) -> u32 {
    let (max_w, max_h) = (max_w.max(1), max_h.max(1));
    let mut factor = 1u32;
    if src_h > max_h || src_w > max_w {
        let half_h = src_h / 2;
        let half_w = src_w / 2;
        while half_h / factor >= max_h && half_w / factor >= max_w {
            factor *= 2;
        }
    }
    factor
}

/// Shrinks `image` by an integer subsample factor.
///
/// A factor of 1 (or 0) borrows the input unchanged.
#[must_use]
pub fn subsample(image: &DynamicImage, factor: u32) -> Cow<'_, DynamicImage> {
    if factor <= 1 {
        return Cow::Borrowed(image);
    }
    let width = (image.width() / factor).max(1);
    let height = (image.height() / factor).max(1);
    Cow::Owned(image.resize_exact(width, height, FilterType::Triangle))
}

/// Working-resolution size for a `width` x `height` image.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn working_size(width: u32, height: u32, scale: f32) -> (u32, u32) {
    let scaled = |v: u32| ((v as f32 * scale).floor() as u32).max(1);
    (scaled(width), scaled(height))
}

/// Scales a decoded image to working resolution.
///
/// # Errors
///
/// Returns [`AnalysisError::Argument`] if `scale` is outside `(0, 1]`, or
/// [`AnalysisError::Decode`] for a zero-sized image.
pub fn to_working_resolution(
    image: &DynamicImage,
    scale: f32,
) -> Result<PixelBuffer, AnalysisError> {
    if !(scale > 0.0 && scale <= 1.0) {
        return Err(AnalysisError::Argument(format!(
            "working scale must be in (0, 1], got {scale}"
        )));
    }
    let rgba: RgbaImage = image.to_rgba8();
    if rgba.width() == 0 || rgba.height() == 0 {
        return PixelBuffer::from_rgba(rgba);
    }
    let (width, height) = working_size(rgba.width(), rgba.height(), scale);
    debug!(
        "Working resolution {}x{} -> {width}x{height}",
        rgba.width(),
        rgba.height()
    );
    if (width, height) == rgba.dimensions() {
        return PixelBuffer::from_rgba(rgba);
    }
    PixelBuffer::from_rgba(imageops::resize(&rgba, width, height, FilterType::Triangle))
}
