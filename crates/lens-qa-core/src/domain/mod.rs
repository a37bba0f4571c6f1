//! Core domain types for lens QA analysis.

mod issue;
mod pixel;
mod qa_module;
mod request;
mod result;

pub use issue::{DirtyLensCause, DirtyLensDetails, Issue, IssueDetails, IssueType};
pub use pixel::PixelBuffer;
pub use qa_module::{Assessment, QaModule};
pub use request::{AnalysisRequest, AnalysisResponse, ErrorBody, ResponseMode};
pub use result::{AnalysisResult, ImageDimensions, ImageInfo};
