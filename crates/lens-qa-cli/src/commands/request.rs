//! Single-image `score` and `is-dirty` commands.
//!
//! Both print exactly one JSON object on stdout, including on failure.

use std::io::Write;

use anyhow::Result;
use clap::Args;
use lens_qa_adapters::RequestHandler;
use lens_qa_core::{AnalysisRequest, AnalysisResponse, DirtyLensAnalyzer, ResponseMode};
use tracing::debug;

use super::{parse_threshold, ExitCode};
use crate::config::AppConfig;

/// Arguments for single-image requests.
#[derive(Args, Clone)]
pub struct RequestArgs {
    /// Image to analyze
    pub path: String,

    /// Dirty-lens score threshold (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub threshold: Option<f32>,
}

/// Builds the response for one request, applying config fallbacks.
pub fn respond(args: &RequestArgs, mode: ResponseMode, config: &AppConfig) -> AnalysisResponse {
    let analyzer = match DirtyLensAnalyzer::new(config.dirty_lens.analyzer_config()) {
        Ok(analyzer) => analyzer,
        Err(e) => return e.into(),
    };

    let request = AnalysisRequest {
        path: args.path.clone(),
        threshold: args.threshold.or(config.dirty_lens.threshold),
    };
    debug!("Handling {mode:?} request for {}", request.path);

    RequestHandler::new(analyzer).handle(&request, mode)
}

/// Runs a request command, printing the JSON response on stdout.
pub fn run(args: &RequestArgs, mode: ResponseMode, config: &AppConfig) -> Result<ExitCode> {
    let response = respond(args, mode, config);

    let json = serde_json::to_string(&response)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{json}")?;
    stdout.flush()?;

    Ok(exit_code(&response))
}

/// `is-dirty` mirrors `check`: 1 when dirty.
const fn exit_code(response: &AnalysisResponse) -> ExitCode {
    match response {
        AnalysisResponse::Error { .. } => ExitCode::Error,
        AnalysisResponse::IsDirty { is_dirty: true } => ExitCode::DirtyFound,
        AnalysisResponse::Score { .. } | AnalysisResponse::IsDirty { is_dirty: false } => {
            ExitCode::Success
        }
    }
}
