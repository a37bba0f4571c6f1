//! The five image-quality signals fused into a dirty-lens score.

use serde::{Deserialize, Serialize};

use super::dark_channel::dark_channel_average;
use super::laplacian::laplacian;
use super::tenengrad::tenengrad;
use super::tone::{brightness, contrast};
use super::LumaBuffer;
use crate::domain::PixelBuffer;

/// Raw feature values computed from one working-resolution image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureSet {
    /// Standard deviation of the Laplacian response.
    pub laplacian_std_dev: f64,
    /// Interior pixels with a strong Laplacian response. Diagnostic only.
    pub edge_count: u64,
    /// Mean Sobel gradient magnitude.
    pub tenengrad: f64,
    /// Population standard deviation of luma.
    pub contrast_std_dev: f64,
    /// Mean luma (0-255).
    pub brightness: f64,
    /// Mean dark channel (0-255).
    pub dark_channel_avg: f64,
}

/// Tunables for feature extraction.
#[derive(Debug, Clone, Copy)]
pub struct ExtractOptions {
    /// Laplacian edge threshold.
    pub edge_threshold: f64,
    /// Dark channel window size.
    pub dark_channel_window: u32,
}

/// Runs all extractors over shared, read-only buffers.
///
/// The extractors are independent and run on the rayon pool; the result is
/// identical to running them one after another.
#[must_use]
pub fn extract(pixels: &PixelBuffer, luma: &LumaBuffer, options: ExtractOptions) -> FeatureSet {
    let ((lap, ten), ((contrast_std_dev, brightness), dark_channel_avg)) = rayon::join(
        || {
            rayon::join(
                || laplacian(luma, options.edge_threshold),
                || tenengrad(luma),
            )
        },
        || {
            rayon::join(
                || rayon::join(|| contrast(luma), || brightness(luma)),
                || dark_channel_average(pixels, options.dark_channel_window),
            )
        },
    );

    FeatureSet {
        laplacian_std_dev: lap.std_dev,
        edge_count: lap.edge_count,
        tenengrad: ten,
        contrast_std_dev,
        brightness,
        dark_channel_avg,
    }
}
