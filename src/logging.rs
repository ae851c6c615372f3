//! Diagnostic logging for dupescan.
//!
//! Reports (text, JSON, CSV) are written to stdout; everything logged here
//! goes to stderr, so `dupescan scan . -o json | jq` stays clean at any
//! verbosity.
//!
//! What each level shows during a scan:
//!
//! - `error`: fatal problems only (`-q`)
//! - `info`: one line per pipeline phase and the final totals (default)
//! - `debug`: effective configuration, candidate and duplicate groups,
//!   each skipped entry (`-v`)
//! - `trace`: per-file detail from the walker and hash workers (`-vv`)
//!
//! A `RUST_LOG` filter replaces the flags entirely, e.g.
//! `RUST_LOG=dupescan::duplicates=trace`.

use env_logger::{Builder, Target};
use log::LevelFilter;
use std::env;
use std::io::Write;

/// Where the active filter came from.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LevelSource {
    /// `RUST_LOG` filter directives
    Env(String),
    /// `-q` / `-v` flags
    Flags(LevelFilter),
}

impl LevelSource {
    fn detect(verbose: u8, quiet: bool) -> Self {
        match env::var("RUST_LOG") {
            Ok(directives) if !directives.trim().is_empty() => Self::Env(directives),
            _ => Self::Flags(determine_level(verbose, quiet)),
        }
    }
}

/// Install the stderr logger for the given `-v` count and `-q` flag.
///
/// Safe to call more than once; later calls leave the first logger in place.
pub fn init_logging(verbose: u8, quiet: bool) {
    let source = LevelSource::detect(verbose, quiet);

    let mut builder = Builder::new();
    builder.target(Target::Stderr);
    match &source {
        LevelSource::Env(directives) => {
            builder.parse_filters(directives);
        }
        LevelSource::Flags(level) => {
            builder.filter_level(*level);
        }
    }
    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        log::debug!("Logger already initialized");
        return;
    }
    log::debug!("Logging initialized: {:?}", source);
}

fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    // Debug builds prefix a timestamp, and the module path once -v is given.
    #[cfg(debug_assertions)]
    builder.format(move |buf, record| {
        let level = record.level();
        let style = buf.default_level_style(level);
        let timestamp = buf.timestamp_seconds();
        write!(buf, "{} {style}{:<5}{style:#} ", timestamp, level)?;
        if verbose >= 1 {
            write!(buf, "[{}] ", record.module_path().unwrap_or("unknown"))?;
        }
        writeln!(buf, "{}", record.args())
    });

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        });
    }
}

/// Name of the most verbose level currently enabled.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
