//! Request and response shapes exchanged with a host dispatch layer.

use serde::{Deserialize, Serialize};

use crate::analysis::DEFAULT_THRESHOLD;
use crate::error::AnalysisError;

/// A single scoring request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Path of the image to analyze.
    #[serde(default)]
    pub path: String,
    /// Classification threshold; defaults to [`DEFAULT_THRESHOLD`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,
}

impl AnalysisRequest {
    /// Creates a request for `path` with the default threshold.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            threshold: None,
        }
    }

    /// Sets an explicit threshold.
    #[must_use]
    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Threshold to classify against.
    #[must_use]
    pub fn threshold(&self) -> f32 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    /// Checks the request before any decoding is attempted.
    ///
    /// # Errors
    ///
    /// Returns [`AnalysisError::Argument`] for a blank path or a non-finite
    /// threshold.
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.path.trim().is_empty() {
            return Err(AnalysisError::Argument("path is missing or empty".into()));
        }
        if let Some(t) = self.threshold {
            if !t.is_finite() {
                return Err(AnalysisError::Argument(format!(
                    "threshold must be a finite number, got {t}"
                )));
            }
        }
        Ok(())
    }
}

/// What the caller wants back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// Return the raw score.
    #[default]
    Score,
    /// Return the thresholded classification.
    IsDirty,
}

/// Response to an [`AnalysisRequest`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalysisResponse {
    /// `{"score": f}`
    Score {
        /// Dirty-lens score.
        score: f32,
    },
    /// `{"isDirty": b}`
    IsDirty {
        /// Classification against the request threshold.
        #[serde(rename = "isDirty")]
        is_dirty: bool,
    },
    /// `{"error": {"code": ..., "message": ...}}`
    Error {
        /// Error payload.
        error: ErrorBody,
    },
}

impl AnalysisResponse {
    /// Returns true for the error variant.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

impl From<AnalysisError> for AnalysisResponse {
    fn from(err: AnalysisError) -> Self {
        Self::Error {
            error: ErrorBody {
                code: err.code().to_string(),
                message: err.to_string(),
            },
        }
    }
}

/// Error payload carried by [`AnalysisResponse::Error`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// One of `ARGUMENT_ERROR`, `DECODE_ERROR`, `PROCESSING_ERROR`.
    pub code: String,
    /// Human readable message.
    pub message: String,
}
