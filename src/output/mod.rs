//! Output formatters for duplicate scan results.
//!
//! - [`text`] for humans (colors and human-readable sizes)
//! - [`json`] for automation and scripting
//! - [`csv`] for spreadsheet import
//!
//! All formatters write to any [`std::io::Write`], normally stdout; logs and
//! progress bars go to stderr.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::DuplicateFinder;
//! use dupescan::error::ExitCode;
//! use dupescan::output::json::JsonOutput;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (groups, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! let output = JsonOutput::new(&groups, &summary, finder.counters().snapshot(), ExitCode::Success);
//! println!("{}", output.to_json_pretty().unwrap());
//! ```

pub mod csv;
pub mod json;
pub mod text;

pub use csv::CsvOutput;
pub use json::JsonOutput;
pub use text::TextOutput;
