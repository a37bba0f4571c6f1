//! Lens QA Core - Dirty-lens scoring pipeline and domain logic
//!
//! This crate contains the scoring pipeline (uniformity short-circuit,
//! feature extraction, fusion), the domain types and ports, and the
//! `QaModule` implementation that plugs the pipeline into batch analysis.

pub mod analysis;
pub mod domain;
pub mod error;
pub mod modules;
pub mod ports;

pub use analysis::{
    compute_dirty_score, is_dirty, AnalyzerConfig, DirtyLensAnalyzer, FeatureSet, ScoreResult,
    DEFAULT_THRESHOLD,
};
pub use domain::{
    AnalysisRequest, AnalysisResponse, AnalysisResult, Assessment, DirtyLensCause,
    DirtyLensDetails, ImageDimensions, ImageInfo, Issue, IssueDetails, IssueType, PixelBuffer,
    QaModule, ResponseMode,
};
pub use error::AnalysisError;
pub use modules::{DirtyLensConfig, DirtyLensModule};
pub use ports::{ImageSource, ProgressEvent, ProgressSink, ResultOutput};
