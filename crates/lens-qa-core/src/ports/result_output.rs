//! Result output port for writing per-image verdicts.

use crate::domain::AnalysisResult;

/// Port for outputting analysis results.
pub trait ResultOutput: Send + Sync {
    /// Writes a single analysis result.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write(&self, result: &AnalysisResult) -> anyhow::Result<()>;

    /// Writes everything collected so far and flushes the underlying sink.
    ///
    /// # Errors
    ///
    /// Returns an error if writing or flushing fails.
    fn flush(&self) -> anyhow::Result<()>;
}
