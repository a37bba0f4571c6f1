//! Request handling for host dispatch layers.
//!
//! Every failure is returned as an error response; a score is only ever
//! produced by a successful analysis.

use std::path::Path;

use lens_qa_core::{
    AnalysisError, AnalysisRequest, AnalysisResponse, DirtyLensAnalyzer, ResponseMode,
};
use tracing::{debug, warn};

use crate::decode::decode_with_config;

/// Decodes and scores requested images with a fixed analyzer.
#[derive(Debug, Clone, Default)]
pub struct RequestHandler {
    analyzer: DirtyLensAnalyzer,
}

impl RequestHandler {
    /// Creates a handler around `analyzer`.
    #[must_use]
    pub const fn new(analyzer: DirtyLensAnalyzer) -> Self {
        Self { analyzer }
    }

    /// Handles one request.
    #[must_use]
    pub fn handle(&self, request: &AnalysisRequest, mode: ResponseMode) -> AnalysisResponse {
        match self.run(request, mode) {
            Ok(response) => response,
            Err(e) => {
                warn!("Request for '{}' failed: {e}", request.path);
                e.into()
            }
        }
    }

    fn run(
        &self,
        request: &AnalysisRequest,
        mode: ResponseMode,
    ) -> Result<AnalysisResponse, AnalysisError> {
        request.validate()?;
        let pixels = decode_with_config(Path::new(&request.path), self.analyzer.config())?;
        let result = self.analyzer.analyze(&pixels, request.threshold())?;
        debug!(
            "Scored {}: {:.3} (dirty: {})",
            request.path, result.dirty_score, result.is_dirty
        );

        Ok(match mode {
            ResponseMode::Score => AnalysisResponse::Score {
                score: result.dirty_score,
            },
            ResponseMode::IsDirty => AnalysisResponse::IsDirty {
                is_dirty: result.is_dirty,
            },
        })
    }
}

/// Handles `request` with the default analyzer.
#[must_use]
pub fn handle_request(request: &AnalysisRequest, mode: ResponseMode) -> AnalysisResponse {
    RequestHandler::default().handle(request, mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_path_is_argument_error() {
        let response = handle_request(&AnalysisRequest::new(""), ResponseMode::Score);
        match response {
            AnalysisResponse::Error { error } => assert_eq!(error.code, "ARGUMENT_ERROR"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn test_nonexistent_file_is_decode_error() {
        let request = AnalysisRequest::new("/nonexistent/lens-qa/missing.jpg");
        match handle_request(&request, ResponseMode::IsDirty) {
            AnalysisResponse::Error { error } => assert_eq!(error.code, "DECODE_ERROR"),
            other => panic!("expected error, got {other:?}"),
        }
    }
}
