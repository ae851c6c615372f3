//! Live scan counters.
//!
//! [`ScanCounters`] is shared between the pipeline, its hashing workers and
//! any number of observers (progress bars, tests). Every access is a single
//! atomic operation, so a [`CounterSnapshot`] can be taken at any time,
//! including while a scan is running.
//!
//! # Example
//!
//! ```
//! use dupescan::counters::ScanCounters;
//!
//! let counters = ScanCounters::new();
//! counters.record_file();
//! counters.record_error();
//!
//! let snapshot = counters.snapshot();
//! assert_eq!(snapshot.files_scanned, 1);
//! assert_eq!(snapshot.errors_encountered, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Atomic counters for one pipeline run.
#[derive(Debug, Default)]
pub struct ScanCounters {
    files_scanned: AtomicU64,
    duplicate_groups_found: AtomicU64,
    errors_encountered: AtomicU64,
    files_to_hash: AtomicU64,
    files_hashed: AtomicU64,
}

/// Point-in-time copy of [`ScanCounters`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CounterSnapshot {
    /// Regular files produced by the walk
    pub files_scanned: u64,
    /// Duplicate groups in the final result
    pub duplicate_groups_found: u64,
    /// Non-fatal walk and hash failures
    pub errors_encountered: u64,
    /// Files queued for content hashing in this run
    pub files_to_hash: u64,
    /// Files whose hashing finished, successfully or not
    pub files_hashed: u64,
}

impl ScanCounters {
    /// Create zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Zero every counter. Called at the start of each run.
    pub fn reset(&self) {
        self.files_scanned.store(0, Ordering::Relaxed);
        self.duplicate_groups_found.store(0, Ordering::Relaxed);
        self.errors_encountered.store(0, Ordering::Relaxed);
        self.files_to_hash.store(0, Ordering::Relaxed);
        self.files_hashed.store(0, Ordering::Relaxed);
    }

    /// Count one file produced by the walk. Returns the new total.
    pub fn record_file(&self) -> u64 {
        self.files_scanned.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Count one non-fatal error.
    pub fn record_error(&self) {
        self.errors_encountered.fetch_add(1, Ordering::Relaxed);
    }

    /// Publish how many files the hashing stage will process.
    pub fn set_files_to_hash(&self, count: usize) {
        self.files_to_hash.store(count as u64, Ordering::Relaxed);
    }

    /// Count one finished hash job. Returns the new total.
    pub fn record_hashed(&self) -> u64 {
        self.files_hashed.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Publish the final duplicate group count.
    pub fn set_duplicate_groups(&self, count: usize) {
        self.duplicate_groups_found
            .store(count as u64, Ordering::Relaxed);
    }

    /// Read all counters.
    ///
    /// Each field is loaded independently; during a run the fields may
    /// come from slightly different instants.
    #[must_use]
    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            files_scanned: self.files_scanned.load(Ordering::Relaxed),
            duplicate_groups_found: self.duplicate_groups_found.load(Ordering::Relaxed),
            errors_encountered: self.errors_encountered.load(Ordering::Relaxed),
            files_to_hash: self.files_to_hash.load(Ordering::Relaxed),
            files_hashed: self.files_hashed.load(Ordering::Relaxed),
        }
    }
}
