//! JSON output formatter for duplicate scan results.
//!
//! # Output Schema
//!
//! ```json
//! {
//!   "generated_at": "2024-01-01T12:00:00+00:00",
//!   "mode": "hash",
//!   "duplicates": [
//!     {
//!       "key": "sha256:ab12...",
//!       "size": 10,
//!       "digest": "ab12...",
//!       "files": [
//!         { "path": "/data/a.txt", "name": "a.txt", "size": 10, "digest": "ab12..." }
//!       ]
//!     }
//!   ],
//!   "summary": { "total_files": 3, "duplicate_groups": 1, "...": "..." },
//!   "counters": { "files_scanned": 3, "duplicate_groups_found": 1, "errors_encountered": 0, "...": "..." }
//! }
//! ```
//!
//! `digest` is `null` in `name_size` mode, where nothing is hashed.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::counters::CounterSnapshot;
use crate::duplicates::{DuplicateGroup, ScanMode, ScanSummary};
use crate::error::ExitCode;
use crate::scanner::FileRecord;

/// One file in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonFile {
    /// Path as produced by the walk
    pub path: String,
    /// File name
    pub name: String,
    /// Size in bytes
    pub size: u64,
    /// SHA-256 hex digest, if computed
    pub digest: Option<String>,
}

impl From<&FileRecord> for JsonFile {
    fn from(file: &FileRecord) -> Self {
        Self {
            path: file.path.to_string_lossy().into_owned(),
            name: file.name.clone(),
            size: file.size,
            digest: file.digest.as_hex().map(str::to_string),
        }
    }
}

/// A single duplicate group in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonDuplicateGroup {
    /// Grouping key as text
    pub key: String,
    /// File size in bytes (shared by all members)
    pub size: u64,
    /// Shared content digest, if the mode hashed
    pub digest: Option<String>,
    /// Member files
    pub files: Vec<JsonFile>,
}

impl JsonDuplicateGroup {
    /// Create a JSON duplicate group from a DuplicateGroup.
    #[must_use]
    pub fn from_duplicate_group(group: &DuplicateGroup) -> Self {
        Self {
            key: group.key.to_string(),
            size: group.size(),
            digest: group.digest().map(str::to_string),
            files: group.files.iter().map(JsonFile::from).collect(),
        }
    }
}

/// Summary statistics in JSON format.
#[derive(Debug, Clone, Serialize)]
pub struct JsonSummary {
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Number of candidate groups after cheap-key grouping
    pub candidate_groups: usize,
    /// Number of files sent to the hashing pool
    pub files_hashed: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding the first of each group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates (bytes)
    pub reclaimable_space: u64,
    /// Entries the walk could not read
    pub walk_errors: usize,
    /// Files that could not be hashed
    pub hash_errors: usize,
    /// Duration of the scan in milliseconds
    pub scan_duration_ms: u64,
    /// Duration of the walking phase in milliseconds
    pub walk_duration_ms: u64,
    /// Duration of the grouping phase in milliseconds
    pub grouping_duration_ms: u64,
    /// Duration of the hashing phase in milliseconds
    pub hashing_duration_ms: u64,
    /// The exit code number
    pub exit_code: i32,
    /// The machine-readable exit code name (e.g., "DS000")
    pub exit_code_name: String,
    /// Messages for every skipped entry
    pub errors: Vec<String>,
}

impl JsonSummary {
    /// Create a JSON summary from a ScanSummary and an exit code.
    #[must_use]
    pub fn from_scan_summary(summary: &ScanSummary, exit_code: ExitCode) -> Self {
        Self {
            total_files: summary.total_files,
            total_size: summary.total_size,
            candidate_groups: summary.candidate_groups,
            files_hashed: summary.files_hashed,
            duplicate_groups: summary.duplicate_groups,
            duplicate_files: summary.duplicate_files,
            reclaimable_space: summary.reclaimable_space,
            walk_errors: summary.walk_errors,
            hash_errors: summary.hash_errors,
            scan_duration_ms: summary.scan_duration.as_millis() as u64,
            walk_duration_ms: summary.walk_duration.as_millis() as u64,
            grouping_duration_ms: summary.grouping_duration.as_millis() as u64,
            hashing_duration_ms: summary.hashing_duration.as_millis() as u64,
            exit_code: exit_code.as_i32(),
            exit_code_name: exit_code.code_prefix().to_string(),
            errors: summary.scan_errors.iter().map(ToString::to_string).collect(),
        }
    }
}

/// Complete JSON output structure.
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// When the report was produced
    pub generated_at: DateTime<Utc>,
    /// Comparison mode of the run
    pub mode: ScanMode,
    /// List of duplicate groups
    pub duplicates: Vec<JsonDuplicateGroup>,
    /// Scan summary statistics
    pub summary: JsonSummary,
    /// Final counter values
    pub counters: CounterSnapshot,
}

impl JsonOutput {
    /// Create a new JSON output from duplicate groups, summary, counters and exit code.
    ///
    /// # Example
    ///
    /// ```
    /// use dupescan::counters::CounterSnapshot;
    /// use dupescan::duplicates::ScanSummary;
    /// use dupescan::error::ExitCode;
    /// use dupescan::output::json::JsonOutput;
    ///
    /// let output = JsonOutput::new(&[], &ScanSummary::default(), CounterSnapshot::default(), ExitCode::NoDuplicates);
    /// assert!(output.duplicates.is_empty());
    /// assert_eq!(output.summary.exit_code, 2);
    /// ```
    #[must_use]
    pub fn new(
        groups: &[DuplicateGroup],
        summary: &ScanSummary,
        counters: CounterSnapshot,
        exit_code: ExitCode,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            mode: summary.mode,
            duplicates: groups
                .iter()
                .map(JsonDuplicateGroup::from_duplicate_group)
                .collect(),
            summary: JsonSummary::from_scan_summary(summary, exit_code),
            counters,
        }
    }

    /// Serialize to compact JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serialize to pretty-printed JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (unlikely for valid data).
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Write JSON to a writer, followed by a newline.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_to<W: Write>(&self, writer: &mut W, pretty: bool) -> Result<(), JsonOutputError> {
        let json = if pretty {
            self.to_json_pretty()?
        } else {
            self.to_json()?
        };
        writer.write_all(json.as_bytes())?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

/// Errors that can occur during JSON output.
#[derive(thiserror::Error, Debug)]
pub enum JsonOutputError {
    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O error during writing
    #[error("I/O error during JSON generation: {0}")]
    Io(#[from] std::io::Error),
}
