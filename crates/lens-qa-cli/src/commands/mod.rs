//! CLI command definitions and handlers.

pub mod check;
pub mod request;

use clap::{Parser, Subcommand};

/// Lens QA - Dirty, smudged and hazy lens detection
#[derive(Parser)]
#[command(name = "lens-qa")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Shared check arguments (paths, threshold, flags).
    #[command(flatten)]
    pub check: check::CheckArgs,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand)]
pub enum Commands {
    /// Analyze images and report dirty-lens verdicts
    Check(check::CheckArgs),
    /// Print the dirty-lens score of one image as JSON
    Score(request::RequestArgs),
    /// Print whether one image was taken through a dirty lens, as JSON
    IsDirty(request::RequestArgs),
}

/// Process exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Every image is clean.
    Success = 0,
    /// At least one image was classified as dirty.
    DirtyFound = 1,
    /// The command could not run.
    Error = 2,
}

impl From<ExitCode> for std::process::ExitCode {
    fn from(code: ExitCode) -> Self {
        Self::from(code as u8)
    }
}

/// Parse and validate a threshold value (0.0-1.0).
pub fn parse_threshold(s: &str) -> Result<f32, String> {
    let value: f32 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("{value} is not in 0.0..=1.0"))
    }
}
