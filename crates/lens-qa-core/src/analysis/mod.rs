//! Dirty-lens scoring pipeline.
//!
//! Stages, in order:
//! 1. uniformity short-circuit (near-solid images score 0.0)
//! 2. luma conversion, once per call
//! 3. five independent feature extractors
//! 4. fusion and haze override
//! 5. threshold classification

mod dark_channel;
mod downsample;
mod features;
mod fusion;
mod laplacian;
mod luma;
mod tenengrad;
mod tone;
mod uniformity;

pub use dark_channel::{dark_channel_average, DEFAULT_WINDOW as DEFAULT_DARK_CHANNEL_WINDOW};
pub use downsample::{
    sample_factor, subsample, to_working_resolution, working_size, DEFAULT_MAX_DIMENSION,
    DEFAULT_WORKING_SCALE,
};
pub use features::{extract, ExtractOptions, FeatureSet};
pub use fusion::{edge_strength_factor, fuse, Fusion, HAZE_OVERRIDE_SCORE};
pub use laplacian::{laplacian, LaplacianStats, DEFAULT_EDGE_THRESHOLD};
pub use luma::{luma_of, LumaBuffer};
pub use tenengrad::tenengrad;
pub use tone::{brightness, contrast};
pub use uniformity::{is_mostly_solid, sample_count, sample_stats, ChannelStats, UniformityConfig};

use serde::Serialize;
use tracing::debug;

use crate::domain::{DirtyLensCause, PixelBuffer};
use crate::error::AnalysisError;

/// Default classification threshold.
pub const DEFAULT_THRESHOLD: f32 = 0.7;

/// Pipeline configuration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyzerConfig {
    /// Decode bound for width.
    pub max_width: u32,
    /// Decode bound for height.
    pub max_height: u32,
    /// Scale from decoded size to working resolution, in `(0, 1]`.
    pub working_scale: f32,
    /// Laplacian edge threshold.
    pub edge_threshold: f64,
    /// Dark channel window, odd and at least 1.
    pub dark_channel_window: u32,
    /// Uniformity short-circuit parameters.
    pub uniformity: UniformityConfig,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            max_width: DEFAULT_MAX_DIMENSION,
            max_height: DEFAULT_MAX_DIMENSION,
            working_scale: DEFAULT_WORKING_SCALE,
            edge_threshold: DEFAULT_EDGE_THRESHOLD,
            dark_channel_window: DEFAULT_DARK_CHANNEL_WINDOW,
            uniformity: UniformityConfig::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Argument`] naming the first invalid field.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(AnalysisError::Argument(format!(
                "max dimensions must be positive, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        if !(self.working_scale > 0.0 && self.working_scale <= 1.0) {
            return Err(AnalysisError::Argument(format!(
                "working_scale must be in (0, 1], got {}",
                self.working_scale
            )));
        }
        if !self.edge_threshold.is_finite() || self.edge_threshold < 0.0 {
            return Err(AnalysisError::Argument(format!(
                "edge_threshold must be a non-negative number, got {}",
                self.edge_threshold
            )));
        }
        if self.dark_channel_window % 2 == 0 {
            return Err(AnalysisError::Argument(format!(
                "dark_channel_window must be odd, got {}",
                self.dark_channel_window
            )));
        }
        let u = &self.uniformity;
        if !(u.sample_ratio >= 0.0 && u.sample_ratio <= 1.0) {
            return Err(AnalysisError::Argument(format!(
                "uniformity sample_ratio must be in [0, 1], got {}",
                u.sample_ratio
            )));
        }
        if !u.std_threshold.is_finite() || u.std_threshold < 0.0 {
            return Err(AnalysisError::Argument(format!(
                "uniformity std_threshold must be a non-negative number, got {}",
                u.std_threshold
            )));
        }
        Ok(())
    }

    const fn extract_options(&self) -> ExtractOptions {
        ExtractOptions {
            edge_threshold: self.edge_threshold,
            dark_channel_window: self.dark_channel_window,
        }
    }
}

/// Outcome of scoring one image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreResult {
    /// Dirty-lens score in `[0, 1]`.
    pub dirty_score: f32,
    /// `dirty_score >= threshold`.
    pub is_dirty: bool,
    /// Threshold used for classification.
    pub threshold: f32,
    /// The uniformity short-circuit fired; no features were computed.
    pub uniform: bool,
    /// Raw features, absent for uniform images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<FeatureSet>,
    /// Gradient signal was preferred over the Laplacian.
    pub used_tenengrad: bool,
    /// Haze override replaced the weighted score.
    pub haze_override: bool,
    /// Dominant contributor, absent for uniform images.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cause: Option<DirtyLensCause>,
}

/// Score and diagnostics before classification.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scored {
    features: Option<FeatureSet>,
    fusion: Option<Fusion>,
}

impl Scored {
    fn score(&self) -> f32 {
        self.fusion.map_or(0.0, |f| f.score)
    }
}

/// Stateless scorer; one instance can serve any number of calls and threads.
#[derive(Debug, Clone, Default)]
pub struct DirtyLensAnalyzer {
    config: AnalyzerConfig,
}

impl DirtyLensAnalyzer {
    /// Creates an analyzer with a validated configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Argument`] if the configuration is invalid.
    pub fn new(config: AnalyzerConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Returns the analyzer configuration.
    #[must_use]
    pub const fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Converts a decoded image to the working-resolution buffer.
    ///
    /// Images larger than the decode bound are first subsampled by the
    /// power-of-two factor a bounded decoder would have used.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Decode`] for zero-sized images.
    pub fn prepare(&self, image: &image::DynamicImage) -> Result<PixelBuffer, AnalysisError> {
        let factor = sample_factor(
            image.width(),
            image.height(),
            self.config.max_width,
            self.config.max_height,
        );
        let bounded = subsample(image, factor);
        to_working_resolution(&bounded, self.config.working_scale)
    }

    /// Dirty-lens score of a working-resolution buffer.
    #[must_use]
    pub fn score(&self, pixels: &PixelBuffer) -> f32 {
        self.run(pixels).score()
    }

    /// Scores and classifies a working-resolution buffer.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Argument`] for a non-finite threshold and
    /// [`AnalysisError::Processing`] if the numeric stages produce a
    /// non-finite score.
    pub fn analyze(
        &self,
        pixels: &PixelBuffer,
        threshold: f32,
    ) -> Result<ScoreResult, AnalysisError> {
        if !threshold.is_finite() {
            return Err(AnalysisError::Argument(format!(
                "threshold must be a finite number, got {threshold}"
            )));
        }

        let scored = self.run(pixels);
        let dirty_score = scored.score();
        if !dirty_score.is_finite() {
            return Err(AnalysisError::Processing(format!(
                "non-finite score for {}x{} buffer",
                pixels.width(),
                pixels.height()
            )));
        }

        Ok(ScoreResult {
            dirty_score,
            is_dirty: dirty_score >= threshold,
            threshold,
            uniform: scored.fusion.is_none(),
            features: scored.features,
            used_tenengrad: scored.fusion.is_some_and(|f| f.used_tenengrad),
            haze_override: scored.fusion.is_some_and(|f| f.haze_override),
            cause: scored.fusion.map(|f| f.dominant_cause()),
        })
    }

    fn run(&self, pixels: &PixelBuffer) -> Scored {
        if is_mostly_solid(pixels, &self.config.uniformity) {
            debug!(
                "Uniform {}x{} image, skipping feature extraction",
                pixels.width(),
                pixels.height()
            );
            return Scored {
                features: None,
                fusion: None,
            };
        }

        let luma = LumaBuffer::from_pixels(pixels);
        let features = extract(pixels, &luma, self.config.extract_options());
        let fusion = fuse(&features);
        debug!(
            ?features,
            used_tenengrad = fusion.used_tenengrad,
            edge_focus = fusion.edge_focus,
            haze_override = fusion.haze_override,
            score = fusion.score,
            "Dirty-lens fusion"
        );

        Scored {
            features: Some(features),
            fusion: Some(fusion),
        }
    }
}

/// Dirty-lens score of `pixels` with the default configuration.
///
/// Deterministic: identical buffers always produce identical scores.
#[must_use]
pub fn compute_dirty_score(pixels: &PixelBuffer) -> f32 {
    DirtyLensAnalyzer::default().score(pixels)
}

/// `compute_dirty_score(pixels) >= threshold`.
#[must_use]
pub fn is_dirty(pixels: &PixelBuffer, threshold: f32) -> bool {
    compute_dirty_score(pixels) >= threshold
}
