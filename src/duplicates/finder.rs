//! Duplicate finder orchestrating the detection pipeline.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs the stages in strict sequence, each finishing
//! before the next starts:
//!
//! 1. **Walk** - Collect every regular file under the root
//! 2. **Candidate grouping** - Partition by a cheap key (see [`crate::duplicates::groups`])
//! 3. **Hashing** - SHA-256 of every candidate on a worker pool (skipped for `name_size`)
//! 4. **Regrouping** - Partition hashed files by their final key
//!
//! Only an invalid root aborts a run. Per-file failures are counted in the
//! finder's [`ScanCounters`] and listed in [`ScanSummary::scan_errors`].
//!
//! # Example
//!
//! ```no_run
//! use dupescan::duplicates::{DuplicateFinder, FinderConfig, ScanMode};
//! use std::path::Path;
//!
//! let config = FinderConfig::default()
//!     .with_mode(ScanMode::Hash)
//!     .with_workers(4);
//! let finder = DuplicateFinder::new(config);
//!
//! let (groups, summary) = finder.find_duplicates(Path::new("/some/path")).unwrap();
//!
//! println!("Found {} duplicate groups", groups.len());
//! println!("Reclaimable space: {} bytes", summary.reclaimable_space);
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::counters::ScanCounters;
use crate::progress::{ProgressCallback, PHASE_WALKING};
use crate::scanner::walker::RootError;
use crate::scanner::{FileRecord, Hasher, ScanError, Walker, WalkerConfig};

use super::groups::{group_candidates, regroup_by_digest, DuplicateGroup, ScanMode};
use super::pool::{hash_files, PoolConfig};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Comparison strategy.
    pub mode: ScanMode,
    /// Number of hashing workers. Default is 4.
    pub workers: usize,
    /// Traversal options.
    pub walker_config: WalkerConfig,
    /// Hash read buffer size in bytes.
    pub buffer_size: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("mode", &self.mode)
            .field("workers", &self.workers)
            .field("walker_config", &self.walker_config)
            .field("buffer_size", &self.buffer_size)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            mode: ScanMode::default(),
            workers: 4,
            walker_config: WalkerConfig::default(),
            buffer_size: crate::scanner::DEFAULT_BUFFER_SIZE,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the comparison mode.
    #[must_use]
    pub fn with_mode(mut self, mode: ScanMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the number of hashing workers (at least 1).
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set whether the walk follows symbolic links.
    #[must_use]
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.walker_config.follow_symlinks = follow;
        self
    }

    /// Set the hash read buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Summary statistics from a duplicate scan.
#[derive(Debug, Default)]
pub struct ScanSummary {
    /// Mode the scan ran with
    pub mode: ScanMode,
    /// Total number of files scanned
    pub total_files: usize,
    /// Total size of all scanned files in bytes
    pub total_size: u64,
    /// Number of candidate groups after cheap-key grouping
    pub candidate_groups: usize,
    /// Number of files in candidate groups
    pub candidate_files: usize,
    /// Number of files sent to the hashing pool
    pub files_hashed: usize,
    /// Number of files whose hash could not be computed
    pub hash_errors: usize,
    /// Number of entries the walk could not read
    pub walk_errors: usize,
    /// Number of confirmed duplicate groups
    pub duplicate_groups: usize,
    /// Total number of duplicate files (excluding the first of each group)
    pub duplicate_files: usize,
    /// Total space that can be reclaimed by removing duplicates
    pub reclaimable_space: u64,
    /// Time spent walking
    pub walk_duration: Duration,
    /// Time spent in candidate grouping
    pub grouping_duration: Duration,
    /// Time spent hashing and regrouping
    pub hashing_duration: Duration,
    /// Duration of the entire scan
    pub scan_duration: Duration,
    /// Errors encountered during the scan
    pub scan_errors: Vec<ScanError>,
}

impl ScanSummary {
    /// Total number of non-fatal errors.
    #[must_use]
    pub fn error_count(&self) -> usize {
        self.walk_errors + self.hash_errors
    }

    /// Whether any file was skipped.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Calculate the percentage of space that is wasted by duplicates.
    #[must_use]
    pub fn wasted_percentage(&self) -> f64 {
        if self.total_size == 0 {
            0.0
        } else {
            (self.reclaimable_space as f64 / self.total_size as f64) * 100.0
        }
    }
}

/// Errors that abort a scan.
#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root directory could not be read.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl From<RootError> for FinderError {
    fn from(error: RootError) -> Self {
        match error {
            RootError::NotFound(path) => Self::PathNotFound(path),
            RootError::NotADirectory(path) => Self::NotADirectory(path),
            RootError::Unreadable { path, source } => Self::Io { path, source },
        }
    }
}

/// Duplicate finder that orchestrates the detection pipeline.
///
/// The finder owns one [`ScanCounters`] instance. It is zeroed at the start
/// of every run and may be read from other threads while a run is in
/// progress (see [`DuplicateFinder::counters`]).
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
    counters: Arc<ScanCounters>,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::new().with_buffer_size(config.buffer_size);
        Self {
            config,
            hasher,
            counters: Arc::new(ScanCounters::new()),
        }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// The finder's configuration.
    #[must_use]
    pub fn config(&self) -> &FinderConfig {
        &self.config
    }

    /// Shared handle to the live counters.
    ///
    /// ```
    /// use dupescan::duplicates::DuplicateFinder;
    ///
    /// let finder = DuplicateFinder::with_defaults();
    /// let counters = finder.counters();
    /// assert_eq!(counters.snapshot().files_scanned, 0);
    /// ```
    #[must_use]
    pub fn counters(&self) -> Arc<ScanCounters> {
        Arc::clone(&self.counters)
    }

    /// Find all duplicate files under the given directory.
    ///
    /// # Errors
    ///
    /// Returns `FinderError` if the path does not exist, is not a directory,
    /// or cannot be listed. Nothing that happens after the walk starts is
    /// fatal.
    pub fn find_duplicates(
        &self,
        path: &Path,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        self.counters.reset();

        let walker = Walker::new(path, self.config.walker_config);
        walker.validate_root()?;

        log::info!(
            "Starting {} scan of {} with {} workers",
            self.config.mode,
            path.display(),
            self.config.workers.max(1)
        );

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_start(PHASE_WALKING, 0);
        }

        let mut files = Vec::new();
        let mut scan_errors = Vec::new();
        for result in walker.walk() {
            match result {
                Ok(file) => {
                    let current = self.counters.record_file();
                    if let Some(ref callback) = self.config.progress_callback {
                        callback.on_progress(current, file.path.to_string_lossy().as_ref());
                    }
                    files.push(file);
                }
                Err(e) => {
                    self.counters.record_error();
                    scan_errors.push(e);
                }
            }
        }

        if let Some(ref callback) = self.config.progress_callback {
            callback.on_phase_end(PHASE_WALKING);
        }

        let walk_duration = start_time.elapsed();
        log::info!(
            "Walk complete: {} files, {} errors in {:.2?}",
            files.len(),
            scan_errors.len(),
            walk_duration
        );

        let (groups, mut summary) = self.run_stages(files);
        summary.walk_errors = scan_errors.len();
        scan_errors.append(&mut summary.scan_errors);
        summary.scan_errors = scan_errors;
        summary.walk_duration = walk_duration;
        summary.scan_duration = start_time.elapsed();

        self.log_completion(&summary);
        Ok((groups, summary))
    }

    /// Find duplicates from a pre-collected list of files.
    ///
    /// Use this method when the file list comes from somewhere other than
    /// the built-in walker. `files_scanned` is set to the list length.
    ///
    /// # Errors
    ///
    /// Never fails today; the `Result` matches [`Self::find_duplicates`].
    pub fn find_duplicates_from_files(
        &self,
        files: Vec<FileRecord>,
    ) -> Result<(Vec<DuplicateGroup>, ScanSummary), FinderError> {
        let start_time = Instant::now();
        self.counters.reset();
        for _ in &files {
            self.counters.record_file();
        }

        let (groups, mut summary) = self.run_stages(files);
        summary.scan_duration = start_time.elapsed();

        self.log_completion(&summary);
        Ok((groups, summary))
    }

    /// Run grouping, hashing and regrouping on a collected file list.
    fn run_stages(&self, files: Vec<FileRecord>) -> (Vec<DuplicateGroup>, ScanSummary) {
        let mode = self.config.mode;
        let mut summary = ScanSummary {
            mode,
            total_files: files.len(),
            total_size: files.iter().map(|f| f.size).sum(),
            ..Default::default()
        };

        let grouping_start = Instant::now();
        let (candidates, grouping_stats) = group_candidates(files, mode);
        summary.grouping_duration = grouping_start.elapsed();
        summary.candidate_groups = grouping_stats.candidate_groups;
        summary.candidate_files = grouping_stats.candidate_files;

        log::info!(
            "Grouping complete: {} -> {} files in {} groups ({:.1}% eliminated)",
            grouping_stats.total_files,
            grouping_stats.candidate_files,
            grouping_stats.candidate_groups,
            grouping_stats.elimination_rate()
        );

        let groups = if mode.requires_hashing() {
            let hashing_start = Instant::now();
            let groups = self.hash_and_regroup(candidates, &mut summary);
            summary.hashing_duration = hashing_start.elapsed();
            groups
        } else {
            log::debug!("Mode {} needs no hashing, candidates are final", mode);
            candidates
        };

        self.counters.set_duplicate_groups(groups.len());
        summary.duplicate_groups = groups.len();
        summary.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();
        summary.reclaimable_space = groups.iter().map(DuplicateGroup::wasted_space).sum();

        (groups, summary)
    }

    fn hash_and_regroup(
        &self,
        candidates: Vec<DuplicateGroup>,
        summary: &mut ScanSummary,
    ) -> Vec<DuplicateGroup> {
        let work: Vec<FileRecord> = candidates.into_iter().flat_map(|g| g.files).collect();
        if work.is_empty() {
            log::info!("No candidates to hash");
            return Vec::new();
        }

        let mut pool_config = PoolConfig::default().with_workers(self.config.workers);
        if let Some(callback) = self.config.progress_callback.as_deref() {
            pool_config = pool_config.with_progress_callback(callback);
        }

        let output = hash_files(work, &self.hasher, &self.counters, pool_config);
        summary.files_hashed = output.files.len();
        summary.hash_errors = output.errors.len();
        summary
            .scan_errors
            .extend(output.errors.into_iter().map(ScanError::from));

        let (groups, regroup_stats) = regroup_by_digest(output.files, self.config.mode);
        log::info!(
            "Regrouping complete: {} groups, {} files ({} excluded after hash failure)",
            regroup_stats.duplicate_groups,
            regroup_stats.duplicate_files,
            regroup_stats.excluded_failed
        );
        groups
    }

    fn log_completion(&self, summary: &ScanSummary) {
        log::info!(
            "Scan complete: {} duplicate groups, {} duplicate files, {} bytes reclaimable, {} errors in {:.2?}",
            summary.duplicate_groups,
            summary.duplicate_files,
            summary.reclaimable_space,
            summary.error_count(),
            summary.scan_duration
        );
        log::debug!("Final counters: {:?}", self.counters.snapshot());
    }
}
