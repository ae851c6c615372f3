//! dupescan - duplicate file finder
//!
//! Finds duplicate files under a directory tree. Cheap keys (file size, or
//! name and size) prune the search space first; only the surviving
//! candidates are read and hashed with SHA-256 on a fixed pool of workers.
//!
//! # Modes
//!
//! - `name_size`: same file name and size, nothing is read
//! - `hash`: same content, any name
//! - `combined`: same name and same content
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, FinderConfig, ScanMode};
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::new(FinderConfig::default().with_mode(ScanMode::Combined));
//! let (groups, _summary) = finder.find_duplicates(Path::new(".")).unwrap();
//! for group in &groups {
//!     println!("{}: {:?}", group.key, group.paths());
//! }
//! ```

pub mod cli;
pub mod config;
pub mod counters;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod scanner;

use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use yansi::Paint;

use crate::cli::{Cli, Commands, ConfigArgs, OutputFormat, ScanArgs};
use crate::config::Config;
use crate::duplicates::DuplicateFinder;
use crate::error::ExitCode;
use crate::output::{CsvOutput, JsonOutput, TextOutput};
use crate::progress::Progress;

/// Run the application for parsed arguments.
///
/// # Errors
///
/// Returns an error if the scan cannot start (invalid root), the config
/// file cannot be written, or the report cannot be written to stdout.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet);

    if cli.no_color {
        yansi::disable();
    }

    log::debug!("Log level: {}", logging::current_level_name());

    match cli.command {
        Commands::Scan(ref args) => run_scan(&cli, args),
        Commands::Config(ref args) => run_config(cli.config.as_deref(), args),
    }
}

fn run_scan(cli: &Cli, args: &ScanArgs) -> Result<ExitCode> {
    let mut config = Config::load(cli.config.as_deref());
    config.merge_scan_args(args);
    log::debug!("Effective configuration: {:?}", config);

    let show_progress = config.progress && !cli.quiet;
    let mut finder_config = config.finder_config();
    if show_progress {
        finder_config = finder_config.with_progress_callback(Arc::new(Progress::new(false)));
    }

    let finder = DuplicateFinder::new(finder_config);
    let (groups, summary) = finder
        .find_duplicates(&args.path)
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;

    let counters = finder.counters().snapshot();
    let exit_code = ExitCode::for_scan(groups.len(), summary.error_count());

    for error in &summary.scan_errors {
        log::debug!("Skipped: {}", error);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match config.output {
        OutputFormat::Text => {
            let color = !cli.no_color && yansi::is_enabled();
            TextOutput::new(&groups, &summary, counters, color)
                .write_to(&mut out)
                .context("Failed to write report")?;
        }
        OutputFormat::Json => {
            JsonOutput::new(&groups, &summary, counters, exit_code)
                .write_to(&mut out, true)
                .context("Failed to write JSON report")?;
        }
        OutputFormat::Csv => {
            CsvOutput::new(&groups)
                .write_to(&mut out)
                .context("Failed to write CSV report")?;
        }
    }
    out.flush().context("Failed to flush stdout")?;

    Ok(exit_code)
}

fn run_config(explicit: Option<&Path>, args: &ConfigArgs) -> Result<ExitCode> {
    let path = Config::resolve_path(explicit)?;

    if args.init {
        Config::init_file(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        eprintln!("{} {}", "Created".green(), path.display());
        return Ok(ExitCode::Success);
    }

    let config = Config::load_from_path(path.clone());
    let rendered = config.to_toml_string()?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "# {}", path.display()).context("Failed to write configuration")?;
    write!(out, "{}", rendered).context("Failed to write configuration")?;
    Ok(ExitCode::Success)
}
