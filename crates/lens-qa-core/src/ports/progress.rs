//! Progress reporting port for UI integration.

use crate::domain::AnalysisResult;

/// Events emitted while a batch of images is scored.
#[derive(Debug, Clone)]
pub enum ProgressEvent {
    /// Scoring started for an image.
    Started {
        /// Path to the image.
        path: String,
        /// Index in the batch (0-based).
        index: usize,
        /// Total images in batch, if known.
        total: Option<usize>,
    },
    /// Scoring completed for an image.
    Completed {
        /// The analysis result.
        result: AnalysisResult,
    },
    /// An image could not be decoded or scored.
    Skipped {
        /// Path to the image.
        path: String,
        /// Reason for skipping.
        reason: String,
    },
    /// All images have been processed.
    Finished {
        /// Images scored successfully.
        processed: usize,
        /// Images skipped.
        skipped: usize,
        /// Images classified as dirty.
        dirty: usize,
    },
}

/// Port for receiving progress events.
pub trait ProgressSink: Send + Sync {
    /// Called when a progress event occurs.
    fn on_event(&self, event: ProgressEvent);
}
