//! Configuration file support for lens-qa.
//!
//! Supports TOML configuration from:
//! - XDG config: `~/.config/lens-qa/config.toml` (lowest priority)
//! - Project-local: `.lens-qa.toml` (searched up directory tree)
//! - CLI flags (highest priority, applied separately)

use std::path::{Path, PathBuf};

use lens_qa_core::analysis::{AnalyzerConfig, UniformityConfig};
use serde::Deserialize;
use tracing::{debug, info, warn};

/// Top-level configuration structure.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// General options.
    pub general: GeneralConfig,
    /// Dirty-lens detection settings.
    pub dirty_lens: DirtyLensConfig,
    /// Output formatting settings.
    pub output: OutputConfig,
}

/// General configuration options.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Recurse into subdirectories by default.
    pub recursive: Option<bool>,
}

/// Dirty-lens detection configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct DirtyLensConfig {
    /// Enable/disable dirty-lens detection.
    pub enabled: Option<bool>,
    /// Classification threshold (0.0-1.0).
    pub threshold: Option<f32>,
    /// Decode bound for width in pixels.
    pub max_width: Option<u32>,
    /// Decode bound for height in pixels.
    pub max_height: Option<u32>,
    /// Scale from decoded size to working resolution, in (0, 1].
    pub working_scale: Option<f32>,
    /// Laplacian response counted as an edge.
    pub edge_threshold: Option<f64>,
    /// Dark channel neighbourhood size (odd).
    pub dark_channel_window: Option<u32>,
    /// Channel standard deviation below which an image is solid.
    pub uniformity_std_threshold: Option<f64>,
    /// Minimum number of pixels sampled for the uniformity test.
    pub uniformity_min_samples: Option<usize>,
    /// Fraction of pixels sampled for the uniformity test.
    pub uniformity_sample_ratio: Option<f64>,
    /// Seed for uniformity sampling.
    pub seed: Option<u64>,
    /// Draw a fresh sampling seed per image instead of a fixed one.
    pub random_seed: Option<bool>,
}

/// Output formatting configuration.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "json" or "jsonl".
    pub format: Option<String>,
    /// Pretty-print JSON output.
    pub pretty: Option<bool>,
    /// Show progress bar.
    pub progress: Option<bool>,
}

impl AppConfig {
    /// Load configuration from XDG and project-local files.
    ///
    /// Priority (lowest to highest):
    /// 1. XDG config: `~/.config/lens-qa/config.toml`
    /// 2. Project-local: `.lens-qa.toml` (searched up from cwd)
    ///
    /// Missing files are silently ignored. Invalid values are logged as warnings.
    pub fn load() -> Self {
        let mut config = Self::default();

        // Load XDG config (lowest priority)
        if let Some(xdg_path) = xdg_config_path() {
            if xdg_path.exists() {
                info!("Loading XDG config: {}", xdg_path.display());
                if let Some(xdg_config) = load_file(&xdg_path) {
                    config = xdg_config;
                }
            } else {
                debug!("XDG config not found: {}", xdg_path.display());
            }
        }

        // Load project-local config (higher priority, merged)
        if let Some(project_path) = find_project_config() {
            info!("Loading project config: {}", project_path.display());
            if let Some(project_config) = load_file(&project_path) {
                config.merge(project_config);
            }
        }

        if let Err(e) = config.validate() {
            warn!("Ignoring invalid config: {e}");
            eprintln!("warning: {e}");
            return Self::default();
        }

        config
    }

    /// Validate configuration values are within acceptable ranges.
    fn validate(&self) -> Result<(), String> {
        let lens = &self.dirty_lens;
        if let Some(t) = lens.threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(format!("dirty_lens.threshold must be 0.0-1.0, got {t}"));
            }
        }
        if lens.max_width == Some(0) || lens.max_height == Some(0) {
            return Err("dirty_lens.max_width and max_height must be positive".to_string());
        }
        if let Some(s) = lens.working_scale {
            if !(s > 0.0 && s <= 1.0) {
                return Err(format!("dirty_lens.working_scale must be in (0, 1], got {s}"));
            }
        }
        if let Some(e) = lens.edge_threshold {
            if !e.is_finite() || e < 0.0 {
                return Err(format!(
                    "dirty_lens.edge_threshold must be non-negative, got {e}"
                ));
            }
        }
        if let Some(w) = lens.dark_channel_window {
            if w % 2 == 0 {
                return Err(format!("dirty_lens.dark_channel_window must be odd, got {w}"));
            }
        }
        if let Some(s) = lens.uniformity_std_threshold {
            if !s.is_finite() || s < 0.0 {
                return Err(format!(
                    "dirty_lens.uniformity_std_threshold must be non-negative, got {s}"
                ));
            }
        }
        if let Some(r) = lens.uniformity_sample_ratio {
            if !(0.0..=1.0).contains(&r) {
                return Err(format!(
                    "dirty_lens.uniformity_sample_ratio must be 0.0-1.0, got {r}"
                ));
            }
        }

        // Output format validation
        if let Some(ref f) = self.output.format {
            if f != "json" && f != "jsonl" {
                return Err(format!(
                    "output.format must be 'json' or 'jsonl', got '{f}'"
                ));
            }
        }

        Ok(())
    }

    /// Merge another config into this one.
    /// Values from `other` override values in `self` when present.
    fn merge(&mut self, other: Self) {
        // General
        self.general.recursive = other.general.recursive.or(self.general.recursive);

        // Dirty lens
        let (lens, theirs) = (&mut self.dirty_lens, other.dirty_lens);
        lens.enabled = theirs.enabled.or(lens.enabled);
        lens.threshold = theirs.threshold.or(lens.threshold);
        lens.max_width = theirs.max_width.or(lens.max_width);
        lens.max_height = theirs.max_height.or(lens.max_height);
        lens.working_scale = theirs.working_scale.or(lens.working_scale);
        lens.edge_threshold = theirs.edge_threshold.or(lens.edge_threshold);
        lens.dark_channel_window = theirs.dark_channel_window.or(lens.dark_channel_window);
        lens.uniformity_std_threshold = theirs
            .uniformity_std_threshold
            .or(lens.uniformity_std_threshold);
        lens.uniformity_min_samples = theirs
            .uniformity_min_samples
            .or(lens.uniformity_min_samples);
        lens.uniformity_sample_ratio = theirs
            .uniformity_sample_ratio
            .or(lens.uniformity_sample_ratio);
        lens.seed = theirs.seed.or(lens.seed);
        lens.random_seed = theirs.random_seed.or(lens.random_seed);

        // Output
        self.output.format = other.output.format.or_else(|| self.output.format.take());
        self.output.pretty = other.output.pretty.or(self.output.pretty);
        self.output.progress = other.output.progress.or(self.output.progress);
    }
}

impl DirtyLensConfig {
    /// Pipeline parameters, falling back to the built-in defaults.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        let defaults = AnalyzerConfig::default();
        let uniformity = UniformityConfig {
            min_samples: self
                .uniformity_min_samples
                .unwrap_or(defaults.uniformity.min_samples),
            sample_ratio: self
                .uniformity_sample_ratio
                .unwrap_or(defaults.uniformity.sample_ratio),
            std_threshold: self
                .uniformity_std_threshold
                .unwrap_or(defaults.uniformity.std_threshold),
            seed: if self.random_seed == Some(true) {
                None
            } else {
                self.seed.or(defaults.uniformity.seed)
            },
        };
        AnalyzerConfig {
            max_width: self.max_width.unwrap_or(defaults.max_width),
            max_height: self.max_height.unwrap_or(defaults.max_height),
            working_scale: self.working_scale.unwrap_or(defaults.working_scale),
            edge_threshold: self.edge_threshold.unwrap_or(defaults.edge_threshold),
            dark_channel_window: self
                .dark_channel_window
                .unwrap_or(defaults.dark_channel_window),
            uniformity,
        }
    }
}

/// Get the XDG config file path.
fn xdg_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("lens-qa").join("config.toml"))
}

/// Find project-local config by searching up from current directory.
fn find_project_config() -> Option<PathBuf> {
    let cwd = std::env::current_dir().ok()?;
    find_config_in_parents(&cwd)
}

/// Search for `.lens-qa.toml` in the given directory and its parents.
fn find_config_in_parents(start: &Path) -> Option<PathBuf> {
    let mut current = Some(start);

    while let Some(dir) = current {
        let config_path = dir.join(".lens-qa.toml");
        if config_path.exists() {
            return Some(config_path);
        }
        current = dir.parent();
    }

    None
}

/// Load and parse a TOML config file.
fn load_file(path: &Path) -> Option<AppConfig> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return None;
        }
    };

    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to parse config file {}: {}", path.display(), e);
            None
        }
    }
}
