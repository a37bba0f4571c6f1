//! Fusion of raw features into a single dirty-lens score.
//!
//! All constants here are empirically tuned against the working resolution
//! and are treated as a fixed contract.

use super::FeatureSet;
use crate::domain::DirtyLensCause;

const LAPLACIAN_DIVISOR: f64 = 30.0;
const LAPLACIAN_MAX: f64 = 1.5;
const TENENGRAD_DIVISOR: f64 = 50.0;
const CONTRAST_DIVISOR: f64 = 50.0;
const DARK_CHANNEL_DIVISOR: f64 = 60.0;
const DARK_CHANNEL_MAX: f64 = 2.0;

/// Below this contrast, above this brightness, or above this dark channel
/// the Laplacian is unreliable and the gradient signal is preferred.
const LOW_CONTRAST: f64 = 15.0;
const HIGH_BRIGHTNESS: f64 = 170.0;
const ELEVATED_DARK_CHANNEL: f64 = 35.0;

const PREFERRED_WEIGHT: f64 = 0.7;

const DARK_CHANNEL_WEIGHT: f64 = 0.4;
const CONTRAST_WEIGHT: f64 = 0.35;
const EDGE_FOCUS_WEIGHT: f64 = 0.25;

const UNFOCUSED_EDGE_FOCUS: f64 = 0.8;
const UNFOCUSED_FACTOR: f64 = 0.5;
const SHARP_EDGE_FOCUS: f64 = 0.3;
const SHARP_FACTOR: f64 = 0.85;

const HAZE_DARK_SCALED: f64 = 0.7;
const HAZE_STRONG_DARK_SCALED: f64 = 1.0;
const HAZE_UNDER_REPORT: f64 = 0.6;

/// Score forced when the haze override fires.
pub const HAZE_OVERRIDE_SCORE: f32 = 0.75;

/// Every intermediate value of the fusion, for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fusion {
    /// `clamp(laplacian / 30, 0, 1.5)`
    pub laplacian_scaled: f64,
    /// `clamp(tenengrad / 50, 0, 1)`
    pub tenengrad_scaled: f64,
    /// `clamp(contrast / 50, 0, 1)`
    pub contrast_scaled: f64,
    /// `clamp(dark_channel / 60, 0, 2)`
    pub dark_channel_scaled: f64,
    /// Whether the 0.7 weight went to the gradient signal.
    pub used_tenengrad: bool,
    /// Inverted blended sharpness; higher means less sharp.
    pub edge_focus: f64,
    /// Weighted sum before the edge-strength correction.
    pub weighted: f64,
    /// Weighted sum after the edge-strength correction.
    pub corrected: f64,
    /// Whether the haze override replaced the corrected score.
    pub haze_override: bool,
    /// Final score.
    pub score: f32,
}

impl Fusion {
    /// Weighted term that contributed most to the score.
    #[must_use]
    pub fn dominant_cause(&self) -> DirtyLensCause {
        if self.haze_override {
            return DirtyLensCause::Haze;
        }
        let haze = DARK_CHANNEL_WEIGHT * self.dark_channel_scaled;
        let low_contrast = CONTRAST_WEIGHT * (1.0 - self.contrast_scaled);
        let defocus = EDGE_FOCUS_WEIGHT * self.edge_focus;
        if haze >= low_contrast && haze >= defocus {
            DirtyLensCause::Haze
        } else if low_contrast >= defocus {
            DirtyLensCause::LowContrast
        } else {
            DirtyLensCause::Defocus
        }
    }
}

/// Multiplier applied for very unfocused (0.5) or sharp (0.85) images.
#[must_use]
pub fn edge_strength_factor(edge_focus: f64) -> f64 {
    if edge_focus > UNFOCUSED_EDGE_FOCUS {
        UNFOCUSED_FACTOR
    } else if edge_focus < SHARP_EDGE_FOCUS {
        SHARP_FACTOR
    } else {
        1.0
    }
}

/// Fuses raw features into a score.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn fuse(features: &FeatureSet) -> Fusion {
    let laplacian_scaled = (features.laplacian_std_dev / LAPLACIAN_DIVISOR).clamp(0.0, LAPLACIAN_MAX);
    let tenengrad_scaled = (features.tenengrad / TENENGRAD_DIVISOR).clamp(0.0, 1.0);
    let contrast_scaled = (features.contrast_std_dev / CONTRAST_DIVISOR).clamp(0.0, 1.0);
    let dark_channel_scaled =
        (features.dark_channel_avg / DARK_CHANNEL_DIVISOR).clamp(0.0, DARK_CHANNEL_MAX);

    let used_tenengrad = features.contrast_std_dev < LOW_CONTRAST
        || features.brightness > HIGH_BRIGHTNESS
        || features.dark_channel_avg > ELEVATED_DARK_CHANNEL;
    let blend = if used_tenengrad {
        PREFERRED_WEIGHT
    } else {
        1.0 - PREFERRED_WEIGHT
    };

    let edge_focus = 1.0 - (blend * tenengrad_scaled + (1.0 - blend) * laplacian_scaled);

    let weighted = DARK_CHANNEL_WEIGHT * dark_channel_scaled
        + CONTRAST_WEIGHT * (1.0 - contrast_scaled)
        + EDGE_FOCUS_WEIGHT * edge_focus;
    let corrected = weighted * edge_strength_factor(edge_focus);

    let hazy = (dark_channel_scaled > HAZE_DARK_SCALED && features.contrast_std_dev < LOW_CONTRAST)
        || dark_channel_scaled > HAZE_STRONG_DARK_SCALED;
    let haze_override = hazy && corrected < HAZE_UNDER_REPORT;

    let score = if haze_override {
        HAZE_OVERRIDE_SCORE
    } else {
        corrected.clamp(0.0, 1.0) as f32
    };

    Fusion {
        laplacian_scaled,
        tenengrad_scaled,
        contrast_scaled,
        dark_channel_scaled,
        used_tenengrad,
        edge_focus,
        weighted,
        corrected,
        haze_override,
        score,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(lap: f64, ten: f64, contrast: f64, brightness: f64, dark: f64) -> FeatureSet {
        FeatureSet {
            laplacian_std_dev: lap,
            edge_count: 0,
            tenengrad: ten,
            contrast_std_dev: contrast,
            brightness,
            dark_channel_avg: dark,
        }
    }

    #[test]
    fn test_scaling_clamps() {
        let f = fuse(&features(300.0, 500.0, 500.0, 128.0, 250.0));
        assert!((f.laplacian_scaled - 1.5).abs() < f64::EPSILON);
        assert!((f.tenengrad_scaled - 1.0).abs() < f64::EPSILON);
        assert!((f.contrast_scaled - 1.0).abs() < f64::EPSILON);
        assert!((f.dark_channel_scaled - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_blend_selection() {
        // Normal regime prefers the Laplacian
        assert!(!fuse(&features(30.0, 50.0, 40.0, 120.0, 10.0)).used_tenengrad);
        // Each trigger on its own switches to the gradient signal
        assert!(fuse(&features(30.0, 50.0, 14.9, 120.0, 10.0)).used_tenengrad);
        assert!(fuse(&features(30.0, 50.0, 40.0, 170.1, 10.0)).used_tenengrad);
        assert!(fuse(&features(30.0, 50.0, 40.0, 120.0, 35.1)).used_tenengrad);
        // Boundaries are strict
        assert!(!fuse(&features(30.0, 50.0, 15.0, 170.0, 35.0)).used_tenengrad);
    }

    #[test]
    fn test_weighted_sum_mid_regime() {
        // lap 15 -> 0.5, ten 25 -> 0.5, contrast 25 -> 0.5, dark 12 -> 0.2
        let f = fuse(&features(15.0, 25.0, 25.0, 120.0, 12.0));
        assert!(!f.used_tenengrad);
        assert!((f.edge_focus - 0.5).abs() < 1e-12);
        let expected = 0.4 * 0.2 + 0.35 * 0.5 + 0.25 * 0.5;
        assert!((f.weighted - expected).abs() < 1e-12);
        // edge_focus in [0.3, 0.8]: no correction
        assert!((f.corrected - expected).abs() < 1e-12);
        assert!(!f.haze_override);
        assert!((f64::from(f.score) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_unfocused_correction_halves() {
        // No edges at all: edge_focus = 1.0
        let f = fuse(&features(0.0, 0.0, 40.0, 120.0, 6.0));
        assert!((f.edge_focus - 1.0).abs() < f64::EPSILON);
        assert!((f.corrected - f.weighted * 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_sharp_correction() {
        let f = fuse(&features(30.0, 50.0, 50.0, 120.0, 30.0));
        // blend 0.3: 1 - (0.3 * 1 + 0.7 * 1) = 0
        assert!(f.edge_focus.abs() < 1e-12);
        assert!((f.corrected - f.weighted * 0.85).abs() < 1e-12);
    }

    #[test]
    fn test_edge_strength_breakpoints() {
        assert!((edge_strength_factor(0.81) - 0.5).abs() < f64::EPSILON);
        assert!((edge_strength_factor(0.8) - 1.0).abs() < f64::EPSILON);
        assert!((edge_strength_factor(0.3) - 1.0).abs() < f64::EPSILON);
        assert!((edge_strength_factor(0.29) - 0.85).abs() < f64::EPSILON);
    }

    #[test]
    fn test_negative_score_clamped_to_zero() {
        // Very sharp high-contrast image: edge_focus = 1 - 1.35 < 0
        let f = fuse(&features(510.0, 300.0, 127.0, 127.0, 0.0));
        assert!(f.corrected < 0.0);
        assert!(f.score.abs() < f32::EPSILON);
    }

    #[test]
    fn test_haze_override_strong_dark_channel() {
        // dark 66 -> 1.1 > 1.0; unfocused halving drags the score under 0.6
        let f = fuse(&features(0.0, 0.0, 30.0, 120.0, 66.0));
        assert!(f.corrected < 0.6, "corrected {}", f.corrected);
        assert!(f.haze_override);
        assert!((f.score - HAZE_OVERRIDE_SCORE).abs() < f32::EPSILON);
        assert_eq!(f.dominant_cause(), DirtyLensCause::Haze);
    }

    #[test]
    fn test_haze_override_low_contrast() {
        // dark 45 -> 0.75 > 0.7 with contrast < 15
        let f = fuse(&features(0.0, 0.0, 10.0, 120.0, 45.0));
        assert!(f.haze_override);
        assert!((f.score - HAZE_OVERRIDE_SCORE).abs() < f32::EPSILON);
    }

    #[test]
    fn test_no_override_without_haze() {
        // dark 45 -> 0.75 but contrast is not low
        let f = fuse(&features(0.0, 0.0, 20.0, 120.0, 45.0));
        assert!(!f.haze_override);
        assert!(f.score < 0.6);
    }

    #[test]
    fn test_no_override_when_score_already_high() {
        // Heavy haze with mid focus: corrected stays above 0.6
        let f = fuse(&features(15.0, 25.0, 5.0, 120.0, 120.0));
        assert!(f.corrected >= 0.6, "corrected {}", f.corrected);
        assert!(!f.haze_override);
        assert!((f.score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_dominant_cause() {
        let low_contrast = fuse(&features(15.0, 25.0, 0.0, 120.0, 0.0));
        assert_eq!(low_contrast.dominant_cause(), DirtyLensCause::LowContrast);

        let defocus = fuse(&features(0.0, 0.0, 50.0, 120.0, 0.0));
        assert_eq!(defocus.dominant_cause(), DirtyLensCause::Defocus);
    }
}
