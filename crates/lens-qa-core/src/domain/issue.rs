//! Issue types detected during lens QA analysis.

use serde::{Deserialize, Serialize};

use crate::analysis::FeatureSet;

/// A quality issue detected in an image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Issue {
    /// Type of issue detected.
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    /// Severity score from 0.0 (ok) to 1.0 (severe).
    pub score: f32,
    /// Issue-specific details.
    pub details: IssueDetails,
}

/// The type of quality issue.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    /// Dirty, hazy or defocused lens.
    DirtyLens,
}

/// Issue-specific details.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IssueDetails {
    /// Dirty-lens scoring details.
    DirtyLens(DirtyLensDetails),
}

/// Details for dirty-lens detection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirtyLensDetails {
    /// Signal that contributed most to the score; absent when the image was
    /// too uniform to extract features.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cause: Option<DirtyLensCause>,
    /// Threshold the score was compared against.
    pub threshold: f32,
    /// Whether the gradient signal was preferred over the Laplacian.
    pub used_tenengrad: bool,
    /// Whether the haze override replaced the weighted score.
    pub haze_override: bool,
    /// Raw feature values.
    pub features: FeatureSet,
}

/// Dominant contributor to a dirty-lens score.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirtyLensCause {
    /// Veiling light raised the dark channel.
    Haze,
    /// Global tonal range is compressed.
    LowContrast,
    /// Edges are soft or missing.
    Defocus,
}
