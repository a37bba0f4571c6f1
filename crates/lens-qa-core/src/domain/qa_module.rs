//! QA module trait for pluggable quality checks.

use super::{ImageInfo, Issue};

/// What a module concluded about one image.
#[derive(Debug, Clone, Default)]
pub struct Assessment {
    /// Module score, if the module produces one.
    pub score: Option<f32>,
    /// Detected issues; empty when the image passed.
    pub issues: Vec<Issue>,
}

/// Trait for implementing quality assessment modules.
///
/// A module inspects one decoded image and reports its score along with the
/// issues it found.
pub trait QaModule: Send + Sync {
    /// Returns the name of this QA module.
    fn name(&self) -> &'static str;

    /// Analyzes an image.
    ///
    /// # Errors
    ///
    /// Returns an error if the image cannot be analyzed at all.
    fn analyze(&self, image: &ImageInfo) -> anyhow::Result<Assessment>;
}
