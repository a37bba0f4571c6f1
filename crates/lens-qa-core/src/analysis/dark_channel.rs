//! Dark channel haze indicator.
//!
//! Clear scenes contain patches where at least one colour channel reaches
//! near black. Haze or a fogged lens adds veiling light, so the local
//! minimum of the per-pixel channel minimum stays elevated everywhere.

use crate::domain::PixelBuffer;

/// Default local-minimum window (pixels, odd).
pub const DEFAULT_WINDOW: u32 = 7;

/// Average dark channel value (0-255) over all pixels.
///
/// The local minimum uses a `window` x `window` neighbourhood clamped to the
/// image bounds. `window` is expected to be odd; even values behave like the
/// next odd size up.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn dark_channel_average(pixels: &PixelBuffer, window: u32) -> f64 {
    let w = pixels.width() as usize;
    let h = pixels.height() as usize;
    let radius = (window / 2) as usize;

    let min_rgb: Vec<u8> = pixels
        .rgb_pixels()
        .map(|[r, g, b]| r.min(g).min(b))
        .collect();

    // A rectangular minimum is separable: rows first, then columns
    let mut rows = vec![0u8; w * h];
    for y in 0..h {
        let row = &min_rgb[y * w..(y + 1) * w];
        for x in 0..w {
            let lo = x.saturating_sub(radius);
            let hi = (x + radius).min(w - 1);
            rows[y * w + x] = row[lo..=hi].iter().copied().min().unwrap_or(u8::MAX);
        }
    }

    let mut total = 0u64;
    for y in 0..h {
        let lo = y.saturating_sub(radius);
        let hi = (y + radius).min(h - 1);
        for x in 0..w {
            let local = (lo..=hi).map(|yy| rows[yy * w + x]).min().unwrap_or(u8::MAX);
            total += u64::from(local);
        }
    }

    total as f64 / (w * h) as f64
}
