//! Dirty-lens detection module.
//!
//! Wraps [`DirtyLensAnalyzer`] so batch analysis can flag smudged, hazy or
//! defocused captures alongside the score.

use crate::analysis::{AnalyzerConfig, DirtyLensAnalyzer, DEFAULT_THRESHOLD};
use crate::domain::{
    Assessment, DirtyLensDetails, ImageInfo, Issue, IssueDetails, IssueType, QaModule,
};
use crate::error::AnalysisError;

/// Configuration for dirty-lens detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirtyLensConfig {
    /// Images scoring at or above this are flagged.
    pub threshold: f32,
    /// Pipeline parameters.
    pub analyzer: AnalyzerConfig,
}

impl Default for DirtyLensConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            analyzer: AnalyzerConfig::default(),
        }
    }
}

/// Dirty-lens QA module.
#[derive(Debug, Clone)]
pub struct DirtyLensModule {
    threshold: f32,
    analyzer: DirtyLensAnalyzer,
}

impl Default for DirtyLensModule {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            analyzer: DirtyLensAnalyzer::default(),
        }
    }
}

impl DirtyLensModule {
    /// Creates a new module with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Argument`] if the threshold is not finite or
    /// the pipeline parameters are invalid.
    pub fn new(config: DirtyLensConfig) -> Result<Self, AnalysisError> {
        if !config.threshold.is_finite() {
            return Err(AnalysisError::Argument(format!(
                "threshold must be a finite number, got {}",
                config.threshold
            )));
        }
        Ok(Self {
            threshold: config.threshold,
            analyzer: DirtyLensAnalyzer::new(config.analyzer)?,
        })
    }

    /// Threshold used for classification.
    #[must_use]
    pub const fn threshold(&self) -> f32 {
        self.threshold
    }
}

impl QaModule for DirtyLensModule {
    fn name(&self) -> &'static str {
        "dirty_lens"
    }

    fn analyze(&self, image: &ImageInfo) -> anyhow::Result<Assessment> {
        let pixels = self.analyzer.prepare(&image.image)?;
        let result = self.analyzer.analyze(&pixels, self.threshold)?;

        let mut issues = Vec::new();
        if result.is_dirty {
            issues.push(Issue {
                issue_type: IssueType::DirtyLens,
                score: result.dirty_score,
                details: IssueDetails::DirtyLens(DirtyLensDetails {
                    cause: result.cause,
                    threshold: result.threshold,
                    used_tenengrad: result.used_tenengrad,
                    haze_override: result.haze_override,
                    features: result.features.unwrap_or_default(),
                }),
            });
        }

        Ok(Assessment {
            score: Some(result.dirty_score),
            issues,
        })
    }
}
