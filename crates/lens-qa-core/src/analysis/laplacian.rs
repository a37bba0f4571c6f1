//! Laplacian variance sharpness estimator.

use serde::{Deserialize, Serialize};

use super::LumaBuffer;

/// Default absolute response above which a pixel counts as an edge.
pub const DEFAULT_EDGE_THRESHOLD: f64 = 20.0;

/// Result of the Laplacian pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LaplacianStats {
    /// Standard deviation of the filter response.
    pub std_dev: f64,
    /// Interior pixels whose absolute response exceeds the edge threshold.
    pub edge_count: u64,
}

/// Convolves interior pixels with `[[0,-1,0],[-1,4,-1],[0,-1,0]]`.
///
/// The one-pixel border is skipped; images narrower or shorter than three
/// pixels yield zeroed stats.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn laplacian(luma: &LumaBuffer, edge_threshold: f64) -> LaplacianStats {
    let (w, h) = (luma.width(), luma.height());
    if w < 3 || h < 3 {
        return LaplacianStats::default();
    }

    let mut sum = 0f64;
    let mut sum_sq = 0f64;
    let mut edge_count = 0u64;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let response = 4 * luma.at(x, y)
                - luma.at(x, y - 1)
                - luma.at(x - 1, y)
                - luma.at(x + 1, y)
                - luma.at(x, y + 1);
            let r = f64::from(response);
            sum += r;
            sum_sq += r * r;
            if r.abs() > edge_threshold {
                edge_count += 1;
            }
        }
    }

    let count = ((w - 2) * (h - 2)) as f64;
    let mean = sum / count;
    let variance = (sum_sq / count - mean * mean).max(0.0);

    LaplacianStats {
        std_dev: variance.sqrt(),
        edge_count,
    }
}
