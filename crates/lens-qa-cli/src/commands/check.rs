//! Check command - score images and report dirty-lens verdicts.

use std::io::IsTerminal;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use lens_qa_adapters::FsImageSource;
use lens_qa_core::{
    AnalysisResult, DirtyLensConfig, DirtyLensModule, ImageDimensions, ImageSource,
    ProgressEvent, ProgressSink, QaModule, ResultOutput, DEFAULT_THRESHOLD,
};
use tracing::{debug, info, warn};

use super::{parse_threshold, ExitCode};
use crate::config::AppConfig;
use crate::output::{JsonOutput, ProgressBar};

/// Output format for results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// JSON Lines (one JSON object per line)
    #[default]
    Jsonl,
    /// Single JSON array
    Json,
}

/// Shared arguments for image analysis.
#[derive(Args, Clone)]
pub struct CheckArgs {
    /// Files or directories to analyze
    pub paths: Vec<PathBuf>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Dirty-lens score threshold (0.0-1.0)
    #[arg(long, value_parser = parse_threshold)]
    pub threshold: Option<f32>,

    /// Show progress bar
    #[arg(long)]
    pub progress: bool,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Pretty-print JSON output (only affects --format json)
    #[arg(long)]
    pub pretty: bool,

    /// Merged config (populated by `with_config`, not from CLI).
    #[arg(skip)]
    config: Option<AppConfig>,
}

impl CheckArgs {
    /// Apply configuration file values, respecting CLI precedence.
    ///
    /// Layering priority (lowest to highest):
    /// 1. Hardcoded defaults (in accessor methods)
    /// 2. Config file values (XDG, then project-local)
    /// 3. CLI arguments (already set on self)
    pub fn with_config(mut args: Self, config: &AppConfig) -> Self {
        if !args.recursive {
            args.recursive = config.general.recursive.unwrap_or(false);
        }

        args.threshold = args.threshold.or(config.dirty_lens.threshold);

        if args.format.is_none() {
            args.format = config
                .output
                .format
                .as_ref()
                .and_then(|s| match s.as_str() {
                    "json" => Some(OutputFormat::Json),
                    "jsonl" => Some(OutputFormat::Jsonl),
                    _ => None,
                });
        }

        if !args.pretty {
            args.pretty = config.output.pretty.unwrap_or(false);
        }
        if !args.progress {
            args.progress = config.output.progress.unwrap_or(false);
        }

        // Pipeline parameters have no CLI flags; keep the config around
        args.config = Some(config.clone());

        args
    }

    /// Get threshold with fallback to the hardcoded default.
    fn threshold(&self) -> f32 {
        self.threshold.unwrap_or(DEFAULT_THRESHOLD)
    }

    /// Get output format with fallback to JSONL.
    fn format(&self) -> OutputFormat {
        self.format.unwrap_or_default()
    }
}

/// Result of running the check command.
#[derive(Debug)]
#[allow(dead_code)] // Counts are read by tests and kept for programmatic use
pub struct CheckResult {
    /// Number of images scored.
    pub processed: usize,
    /// Number of images that could not be loaded.
    pub skipped: usize,
    /// Number of images classified as dirty.
    pub dirty: usize,
    /// Exit code.
    pub exit_code: ExitCode,
}

/// Run the check command.
///
/// Expects `args` to have been processed through `with_config()` first
/// to apply configuration file settings.
pub fn run(args: &CheckArgs) -> Result<CheckResult> {
    info!("Running check command on {} paths", args.paths.len());

    if args.paths.is_empty() {
        anyhow::bail!("No paths specified");
    }

    let source = FsImageSource::new(args.paths.clone(), args.recursive);
    let total = source.count_hint();

    let show_progress = !args.quiet && (args.progress || std::io::stderr().is_terminal());
    let progress_bar = ProgressBar::new(total.map(|t| t as u64), args.quiet, show_progress);

    let output = JsonOutput::stdout(args.format(), args.pretty);

    let modules = build_modules(args)?;
    if modules.is_empty() {
        warn!("Dirty-lens detection disabled, nothing to check");
        return Ok(CheckResult {
            processed: 0,
            skipped: 0,
            dirty: 0,
            exit_code: ExitCode::Success,
        });
    }

    process_images(&source, &modules, &output, &progress_bar)
}

/// Build QA modules based on merged args (CLI + config).
fn build_modules(args: &CheckArgs) -> Result<Vec<Box<dyn QaModule>>> {
    let mut modules: Vec<Box<dyn QaModule>> = Vec::new();
    let lens = args.config.as_ref().map(|c| &c.dirty_lens);

    if lens.and_then(|l| l.enabled).unwrap_or(true) {
        let module_config = DirtyLensConfig {
            threshold: args.threshold(),
            analyzer: lens.map(|l| l.analyzer_config()).unwrap_or_default(),
        };
        let module = DirtyLensModule::new(module_config)
            .context("Invalid dirty-lens configuration")?;
        modules.push(Box::new(module));
        debug!("Enabled dirty_lens module (threshold {})", args.threshold());
    }

    Ok(modules)
}

/// Process images through QA modules.
pub fn process_images(
    source: &dyn ImageSource,
    modules: &[Box<dyn QaModule>],
    output: &dyn ResultOutput,
    progress: &dyn ProgressSink,
) -> Result<CheckResult> {
    let total = source.count_hint();
    let mut processed = 0usize;
    let mut skipped = 0usize;
    let mut dirty = 0usize;

    for (index, image_result) in source.images().enumerate() {
        let image = match image_result {
            Ok(img) => img,
            Err(e) => {
                // The error message carries the path via anyhow context
                progress.on_event(ProgressEvent::Skipped {
                    path: format!("image {index}"),
                    reason: format!("{e:#}"),
                });
                skipped += 1;
                continue;
            }
        };

        let path = image.path.clone();

        progress.on_event(ProgressEvent::Started {
            path: path.clone(),
            index,
            total,
        });

        let mut score: Option<f32> = None;
        let mut issues = Vec::new();
        let mut failed = false;
        for module in modules {
            match module.analyze(&image) {
                Ok(mut assessment) => {
                    score = match (score, assessment.score) {
                        (Some(a), Some(b)) => Some(a.max(b)),
                        (a, b) => a.or(b),
                    };
                    issues.append(&mut assessment.issues);
                }
                Err(e) => {
                    warn!("Module {} failed for {}: {e:#}", module.name(), path);
                    failed = true;
                }
            }
        }

        if failed && score.is_none() {
            progress.on_event(ProgressEvent::Skipped {
                path,
                reason: "analysis failed".to_string(),
            });
            skipped += 1;
            continue;
        }

        let is_dirty = !issues.is_empty();
        if is_dirty {
            dirty += 1;
        }

        let result = AnalysisResult {
            path,
            timestamp: iso_timestamp(),
            dimensions: ImageDimensions::new(image.width, image.height),
            score,
            is_dirty,
            issues,
        };

        progress.on_event(ProgressEvent::Completed {
            result: result.clone(),
        });
        output.write(&result)?;
        processed += 1;
    }

    output.flush()?;

    progress.on_event(ProgressEvent::Finished {
        processed,
        skipped,
        dirty,
    });

    let exit_code = if dirty > 0 {
        ExitCode::DirtyFound
    } else if processed == 0 && skipped > 0 {
        ExitCode::Error
    } else {
        ExitCode::Success
    };

    Ok(CheckResult {
        processed,
        skipped,
        dirty,
        exit_code,
    })
}

/// Generate ISO 8601 UTC timestamp (RFC 3339 format).
fn iso_timestamp() -> String {
    match time::OffsetDateTime::now_utc().format(&time::format_description::well_known::Rfc3339) {
        Ok(ts) => ts,
        Err(e) => {
            debug!("Timestamp format failed: {e}");
            String::from("1970-01-01T00:00:00Z")
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use lens_qa_test_support::{
        FailingImageSource, MockImageSource, MockProgressSink, MockResultOutput,
        SyntheticImageBuilder,
    };

    fn default_modules() -> Vec<Box<dyn QaModule>> {
        vec![Box::new(DirtyLensModule::default())]
    }

    #[test]
    fn test_clean_batch_exits_success() {
        let source = MockImageSource::new(vec![
            SyntheticImageBuilder::flat_image(),
            SyntheticImageBuilder::checkerboard_with_cell_size(500, 500, 50),
        ]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let result = process_images(&source, &default_modules(), &output, &progress).unwrap();

        assert_eq!(result.processed, 2);
        assert_eq!(result.dirty, 0);
        assert_eq!(result.exit_code, ExitCode::Success);

        let results = output.results();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].score, Some(0.0));
        assert!(results.iter().all(|r| !r.is_dirty && r.issues.is_empty()));
        assert_eq!(output.flush_count(), 1);
        assert_eq!(progress.finished_counts(), Some((2, 0, 0)));
    }

    #[test]
    fn test_dirty_image_sets_exit_code() {
        let source = MockImageSource::new(vec![
            SyntheticImageBuilder::flat_image(),
            SyntheticImageBuilder::hazy(500, 500, 40, 180, 0.75),
        ]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let result = process_images(&source, &default_modules(), &output, &progress).unwrap();

        assert_eq!(result.dirty, 1);
        assert_eq!(result.exit_code, ExitCode::DirtyFound);
        let hazy = &output.results()[1];
        assert!(hazy.is_dirty);
        assert_eq!(hazy.issues.len(), 1);
        assert!(hazy.score.unwrap() >= DEFAULT_THRESHOLD);
    }

    #[test]
    fn test_load_failures_are_skipped() {
        let source = FailingImageSource::new(
            vec![SyntheticImageBuilder::flat_image()],
            vec!["broken.jpg".into()],
        );
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let result = process_images(&source, &default_modules(), &output, &progress).unwrap();

        assert_eq!(result.processed, 1);
        assert_eq!(result.skipped, 1);
        assert_eq!(result.exit_code, ExitCode::Success);
        assert_eq!(progress.skipped_count(), 1);
        assert_eq!(output.results().len(), 1);
    }

    #[test]
    fn test_only_failures_is_an_error() {
        let source = FailingImageSource::new(vec![], vec!["a.jpg".into(), "b.png".into()]);
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let result = process_images(&source, &default_modules(), &output, &progress).unwrap();

        assert_eq!(result.skipped, 2);
        assert_eq!(result.exit_code, ExitCode::Error);
    }

    #[test]
    fn test_empty_source_exits_success() {
        let source = MockImageSource::empty();
        let output = MockResultOutput::new();
        let progress = MockProgressSink::new();

        let result = process_images(&source, &default_modules(), &output, &progress).unwrap();

        assert_eq!(result.processed, 0);
        assert_eq!(result.exit_code, ExitCode::Success);
        assert!(progress.has_finished());
    }

    #[test]
    fn test_config_layering_on_args() {
        let config: AppConfig = toml::from_str(
            r"
[general]
recursive = true

[dirty_lens]
threshold = 0.4

[output]
format = 'json'
pretty = true
",
        )
        .unwrap();

        let args = CheckArgs {
            paths: vec![PathBuf::from("x.png")],
            recursive: false,
            threshold: Some(0.9),
            progress: false,
            quiet: true,
            format: None,
            pretty: false,
            config: None,
        };
        let merged = CheckArgs::with_config(args, &config);

        assert!(merged.recursive);
        // CLI threshold wins over config
        assert!((merged.threshold() - 0.9).abs() < f32::EPSILON);
        assert_eq!(merged.format(), OutputFormat::Json);
        assert!(merged.pretty);
    }

    #[test]
    fn test_disabled_module_builds_nothing() {
        let config: AppConfig = toml::from_str("[dirty_lens]\nenabled = false\n").unwrap();
        let args = CheckArgs {
            paths: vec![PathBuf::from("x.png")],
            recursive: false,
            threshold: None,
            progress: false,
            quiet: true,
            format: None,
            pretty: false,
            config: None,
        };
        let merged = CheckArgs::with_config(args, &config);
        assert!(build_modules(&merged).unwrap().is_empty());
    }
}
