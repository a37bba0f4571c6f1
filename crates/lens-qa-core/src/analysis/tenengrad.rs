//! Tenengrad gradient-energy sharpness estimator.

use super::LumaBuffer;

/// Mean Sobel gradient magnitude over interior pixels.
///
/// Uses Sobel-X `[[-1,0,1],[-2,0,2],[-1,0,1]]` and Sobel-Y
/// `[[1,2,1],[0,0,0],[-1,-2,-1]]`. Returns 0 when either dimension is below 3.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn tenengrad(luma: &LumaBuffer) -> f64 {
    let (w, h) = (luma.width(), luma.height());
    if w < 3 || h < 3 {
        return 0.0;
    }

    let mut total = 0f64;
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let tl = luma.at(x - 1, y - 1);
            let tc = luma.at(x, y - 1);
            let tr = luma.at(x + 1, y - 1);
            let ml = luma.at(x - 1, y);
            let mr = luma.at(x + 1, y);
            let bl = luma.at(x - 1, y + 1);
            let bc = luma.at(x, y + 1);
            let br = luma.at(x + 1, y + 1);

            let gx = -tl + tr - 2 * ml + 2 * mr - bl + br;
            let gy = tl + 2 * tc + tr - bl - 2 * bc - br;
            total += f64::from(gx).hypot(f64::from(gy));
        }
    }

    total / ((w - 2) * (h - 2)) as f64
}
