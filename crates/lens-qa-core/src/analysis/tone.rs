//! Global tone statistics: brightness and contrast.

use super::LumaBuffer;

/// Mean luma on a 0-255 scale.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn brightness(luma: &LumaBuffer) -> f64 {
    let raw = luma.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let sum: u64 = raw.iter().map(|&v| u64::from(v)).sum();
    sum as f64 / raw.len() as f64
}

/// Population standard deviation of luma (divides by N).
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn contrast(luma: &LumaBuffer) -> f64 {
    let raw = luma.as_raw();
    if raw.is_empty() {
        return 0.0;
    }
    let mean = brightness(luma);
    let variance = raw
        .iter()
        .map(|&v| {
            let diff = f64::from(v) - mean;
            diff * diff
        })
        .sum::<f64>()
        / raw.len() as f64;
    variance.sqrt()
}
