//! Typed failures surfaced by the scoring pipeline.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while preparing or scoring an image.
///
/// A failure is never reported as a score: a score of `0.0` always means a
/// clean classification.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The caller supplied a missing or invalid argument.
    #[error("invalid argument: {0}")]
    Argument(String),

    /// The image could not be read or decoded.
    #[error("failed to decode image '{}': {reason}", path.display())]
    Decode {
        /// Path of the offending file (empty for in-memory buffers).
        path: PathBuf,
        /// Human readable reason.
        reason: String,
    },

    /// Unexpected failure inside the numeric stages.
    #[error("processing failed: {0}")]
    Processing(String),
}

impl AnalysisError {
    /// Stable error code used on the request/response boundary.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::Argument(_) => "ARGUMENT_ERROR",
            Self::Decode { .. } => "DECODE_ERROR",
            Self::Processing(_) => "PROCESSING_ERROR",
        }
    }

    /// Shorthand for a decode failure on `path`.
    pub fn decode(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Decode {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}
