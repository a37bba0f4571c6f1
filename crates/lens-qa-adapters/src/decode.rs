//! Bounded decoding of image files into working-resolution buffers.

use std::path::Path;

use image::ImageReader;
use lens_qa_core::analysis::{sample_factor, subsample, to_working_resolution, AnalyzerConfig};
use lens_qa_core::{AnalysisError, PixelBuffer};
use tracing::debug;

/// Decodes `path` and reduces it to the working resolution, bounding the
/// intermediate decode by `max_w` x `max_h`.
///
/// # Errors
///
/// Returns [`AnalysisError::Argument`] for an empty path and
/// [`AnalysisError::Decode`] for any I/O, format or zero-dimension failure.
pub fn decode_for_analysis(
    path: &Path,
    max_w: u32,
    max_h: u32,
) -> Result<PixelBuffer, AnalysisError> {
    let config = AnalyzerConfig {
        max_width: max_w,
        max_height: max_h,
        ..AnalyzerConfig::default()
    };
    decode_with_config(path, &config)
}

/// Like [`decode_for_analysis`], taking the bound and working scale from
/// `config`.
///
/// # Errors
///
/// Returns [`AnalysisError::Argument`] for an empty path or an invalid
/// working scale and [`AnalysisError::Decode`] for any I/O, format or
/// zero-dimension failure.
pub fn decode_with_config(
    path: &Path,
    config: &AnalyzerConfig,
) -> Result<PixelBuffer, AnalysisError> {
    if path.as_os_str().is_empty() {
        return Err(AnalysisError::Argument("path is missing or empty".into()));
    }

    let (width, height) = open(path)?
        .into_dimensions()
        .map_err(|e| AnalysisError::decode(path, e))?;
    if width == 0 || height == 0 {
        return Err(AnalysisError::decode(
            path,
            format!("zero-sized image {width}x{height}"),
        ));
    }

    let factor = sample_factor(width, height, config.max_width, config.max_height);
    debug!(
        "Decoding {} ({width}x{height}) with sample factor {factor}",
        path.display()
    );

    let image = open(path)?
        .decode()
        .map_err(|e| AnalysisError::decode(path, e))?;
    let bounded = subsample(&image, factor);

    to_working_resolution(&bounded, config.working_scale).map_err(|e| match e {
        AnalysisError::Decode { reason, .. } => AnalysisError::decode(path, reason),
        other => other,
    })
}

fn open(path: &Path) -> Result<ImageReader<std::io::BufReader<std::fs::File>>, AnalysisError> {
    ImageReader::open(path)
        .and_then(ImageReader::with_guessed_format)
        .map_err(|e| AnalysisError::decode(path, e))
}
