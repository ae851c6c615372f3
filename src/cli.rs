//! Command-line interface definitions for dupescan.
//!
//! Global options (verbosity, color, config file) plus two subcommands:
//! `scan` runs the pipeline, `config` shows or creates the config file.
//!
//! # Example
//!
//! ```bash
//! # Content duplicates with 8 hashing workers
//! dupescan scan ~/Downloads --workers 8
//!
//! # Same name and size only, nothing is read
//! dupescan scan ~/Downloads --mode name_size
//!
//! # JSON report for scripting
//! dupescan -q scan ~/Downloads --output json > dupes.json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::duplicates::ScanMode;

/// Find duplicate files by name, size and SHA-256 content.
#[derive(Debug, Parser)]
#[command(name = "dupescan")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Read configuration from this file instead of the default location
    #[arg(long = "config", id = "config_file", global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Print errors as JSON objects on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Scan a directory for duplicate files
    Scan(ScanArgs),
    /// Show the effective configuration, or write a default config file
    Config(ConfigArgs),
}

/// Arguments for the scan subcommand.
///
/// Options left unset fall back to the config file, then the environment,
/// then built-in defaults.
#[derive(Debug, Args)]
pub struct ScanArgs {
    /// Directory path to scan for duplicates
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Comparison mode
    #[arg(short, long, value_enum)]
    pub mode: Option<ScanMode>,

    /// Number of concurrent hashing workers (at least 1)
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    pub workers: Option<u64>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Follow symbolic links during scan
    ///
    /// Symlink loops are reported as skipped entries.
    #[arg(long, overrides_with = "no_follow_symlinks")]
    pub follow_symlinks: bool,

    /// Do not follow symbolic links (default)
    #[arg(long, overrides_with = "follow_symlinks")]
    pub no_follow_symlinks: bool,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,
}

impl ScanArgs {
    /// Symlink choice from the command line, if one was given.
    #[must_use]
    pub fn follow_symlinks_override(&self) -> Option<bool> {
        if self.follow_symlinks {
            Some(true)
        } else if self.no_follow_symlinks {
            Some(false)
        } else {
            None
        }
    }
}

/// Arguments for the config subcommand.
#[derive(Debug, Args)]
pub struct ConfigArgs {
    /// Write a config file with default values (fails if one exists)
    #[arg(long)]
    pub init: bool,
}

/// Output format for scan results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable listing
    #[default]
    Text,
    /// JSON document for scripting
    Json,
    /// CSV, one row per file
    Csv,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Csv => write!(f, "csv"),
        }
    }
}
