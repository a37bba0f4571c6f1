//! Near-solid-colour detection by random pixel sampling.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::domain::PixelBuffer;

/// Sampling parameters for the uniformity test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformityConfig {
    /// Lower bound on the number of sampled pixels.
    pub min_samples: usize,
    /// Fraction of all pixels to sample when that exceeds `min_samples`.
    pub sample_ratio: f64,
    /// A channel is flat when its standard deviation is below this (0-255 scale).
    pub std_threshold: f64,
    /// Seed for pixel selection. `None` draws a fresh seed per call.
    pub seed: Option<u64>,
}

impl Default for UniformityConfig {
    fn default() -> Self {
        Self {
            min_samples: 100,
            sample_ratio: 0.01,
            std_threshold: 12.0,
            seed: Some(0x5EED_1E45),
        }
    }
}

/// Per-channel statistics over the sampled pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelStats {
    /// Number of pixels sampled.
    pub samples: usize,
    /// Mean of red, green and blue.
    pub mean: [f64; 3],
    /// Population standard deviation of red, green and blue.
    pub std_dev: [f64; 3],
}

/// Number of pixels to sample from an image with `total` pixels.
#[must_use]
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn sample_count(total: usize, config: &UniformityConfig) -> usize {
    let by_ratio = (total as f64 * config.sample_ratio) as usize;
    config.min_samples.max(by_ratio).min(total)
}

/// Samples random pixels and returns their channel statistics.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn sample_stats(pixels: &PixelBuffer, config: &UniformityConfig) -> ChannelStats {
    let total = pixels.pixel_count();
    let samples = sample_count(total, config);

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_rng(&mut rand::rng()),
    };

    let mut sum = [0f64; 3];
    let mut sum_sq = [0f64; 3];
    for _ in 0..samples {
        let rgb = pixels.rgb_at(rng.random_range(0..total));
        for (c, &v) in rgb.iter().enumerate() {
            let v = f64::from(v);
            sum[c] += v;
            sum_sq[c] += v * v;
        }
    }

    if samples == 0 {
        return ChannelStats {
            samples,
            mean: [0.0; 3],
            std_dev: [0.0; 3],
        };
    }

    let n = samples as f64;
    let mean = sum.map(|s| s / n);
    let mut std_dev = [0f64; 3];
    for c in 0..3 {
        std_dev[c] = (sum_sq[c] / n - mean[c] * mean[c]).max(0.0).sqrt();
    }

    ChannelStats {
        samples,
        mean,
        std_dev,
    }
}

/// Returns true when the image is (nearly) a single solid colour.
///
/// Images with at most one pixel are always solid.
#[must_use]
pub fn is_mostly_solid(pixels: &PixelBuffer, config: &UniformityConfig) -> bool {
    if pixels.pixel_count() <= 1 {
        return true;
    }
    let stats = sample_stats(pixels, config);
    stats.std_dev.iter().all(|&sd| sd < config.std_threshold)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::cast_possible_truncation)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn buffer(width: u32, height: u32, f: impl Fn(u32, u32) -> [u8; 3]) -> PixelBuffer {
        let img = RgbaImage::from_fn(width, height, |x, y| {
            let [r, g, b] = f(x, y);
            Rgba([r, g, b, 255])
        });
        PixelBuffer::from_rgba(img).unwrap()
    }

    #[test]
    fn test_sample_count_bounds() {
        let config = UniformityConfig::default();
        assert_eq!(sample_count(50, &config), 50);
        assert_eq!(sample_count(1_000, &config), 100);
        assert_eq!(sample_count(1_000_000, &config), 10_000);
    }

    #[test]
    fn test_single_pixel_is_solid() {
        let buf = buffer(1, 1, |_, _| [200, 10, 30]);
        assert!(is_mostly_solid(&buf, &UniformityConfig::default()));
    }

    #[test]
    fn test_uniform_color_is_solid() {
        let buf = buffer(64, 48, |_, _| [12, 200, 90]);
        let config = UniformityConfig {
            seed: None,
            ..UniformityConfig::default()
        };
        assert!(is_mostly_solid(&buf, &config));
        let stats = sample_stats(&buf, &config);
        assert_eq!(stats.std_dev, [0.0; 3]);
        assert_eq!(stats.mean, [12.0, 200.0, 90.0]);
    }

    #[test]
    fn test_slight_noise_is_still_solid() {
        let buf = buffer(50, 50, |x, y| {
            let v = 120 + ((x + y) % 5) as u8;
            [v, v, v]
        });
        assert!(is_mostly_solid(&buf, &UniformityConfig::default()));
    }

    #[test]
    fn test_checkerboard_is_not_solid() {
        let buf = buffer(40, 40, |x, y| {
            if (x / 4 + y / 4) % 2 == 0 {
                [255, 255, 255]
            } else {
                [0, 0, 0]
            }
        });
        assert!(!is_mostly_solid(&buf, &UniformityConfig::default()));
    }

    #[test]
    fn test_single_varying_channel_is_not_solid() {
        let buf = buffer(40, 40, |x, _| [100, 100, if x < 20 { 0 } else { 255 }]);
        assert!(!is_mostly_solid(&buf, &UniformityConfig::default()));
    }

    #[test]
    fn test_seeded_sampling_is_reproducible() {
        let buf = buffer(30, 30, |x, y| [(x * 7) as u8, (y * 5) as u8, 0]);
        let config = UniformityConfig::default();
        assert_eq!(sample_stats(&buf, &config), sample_stats(&buf, &config));
    }
}
