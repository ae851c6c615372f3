//! Fixed-size worker pool for content hashing.
//!
//! # Overview
//!
//! [`hash_files`] flattens the candidates into a single job queue and runs
//! `workers` threads over it:
//!
//! 1. Every record is pushed onto a channel sized to hold all of them, so
//!    the producer never waits on a worker.
//! 2. The sending half is dropped. That closes the queue: a worker's `recv`
//!    fails once the queue is both closed and empty, and the worker exits.
//! 3. Each worker owns the record it received, sets its digest, and moves
//!    it to a result channel. A record is never visible to two threads at
//!    once.
//! 4. The scope joins every worker before any result is read.
//!
//! A file that fails to hash is marked [`ContentDigest::Failed`], counted,
//! and the worker moves on. One bad file cannot stop the pool.

use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::counters::ScanCounters;
use crate::progress::{ProgressCallback, PHASE_HASHING};
use crate::scanner::{ContentDigest, FileRecord, HashError, Hasher};

/// Threshold for logging large files.
const LARGE_FILE_THRESHOLD: u64 = 100 * 1024 * 1024; // 100MB

/// Configuration for the hashing pool.
#[derive(Clone, Copy)]
pub struct PoolConfig<'a> {
    /// Number of worker threads (clamped to at least 1).
    pub workers: usize,
    /// Optional progress callback.
    pub progress_callback: Option<&'a dyn ProgressCallback>,
}

impl std::fmt::Debug for PoolConfig<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PoolConfig")
            .field("workers", &self.workers)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for PoolConfig<'_> {
    fn default() -> Self {
        Self {
            workers: 4,
            progress_callback: None,
        }
    }
}

impl<'a> PoolConfig<'a> {
    /// Set the worker count.
    #[must_use]
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: &'a dyn ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Outcome of one pool run.
#[derive(Debug, Default)]
pub struct PoolOutput {
    /// Every input record, digest set to `Computed` or `Failed`
    pub files: Vec<FileRecord>,
    /// One entry per failed file
    pub errors: Vec<HashError>,
    /// Bytes of successfully hashed files
    pub bytes_hashed: u64,
}

/// Message from a worker back to the orchestrator.
struct Completed {
    file: FileRecord,
    error: Option<HashError>,
}

/// Hash every file with at most `config.workers` hashes in flight.
///
/// Returns once every worker has exited. Order of the returned records is
/// unspecified.
///
/// # Arguments
///
/// * `files` - Records to hash (digests are overwritten)
/// * `hasher` - Shared hasher
/// * `counters` - Run counters; `errors_encountered` and `files_hashed` are
///   updated as workers finish items
/// * `config` - Worker count and progress reporting
#[must_use]
pub fn hash_files(
    files: Vec<FileRecord>,
    hasher: &Hasher,
    counters: &ScanCounters,
    config: PoolConfig<'_>,
) -> PoolOutput {
    let total = files.len();
    counters.set_files_to_hash(total);

    if total == 0 {
        log::debug!("Hash pool: nothing to hash");
        return PoolOutput::default();
    }

    let workers = config.workers.max(1).min(total);
    let start = Instant::now();

    if let Some(callback) = config.progress_callback {
        callback.on_phase_start(PHASE_HASHING, total);
    }

    log::info!("Hashing {} files with {} workers", total, workers);

    // Capacity covers every item, so neither side ever blocks on a full queue.
    let (job_tx, job_rx) = bounded::<FileRecord>(total);
    let (done_tx, done_rx) = bounded::<Completed>(total);

    for file in files {
        if let Err(rejected) = job_tx.send(file) {
            // Unreachable while `job_rx` is alive; fail the file rather than lose it.
            let file = rejected.into_inner();
            log::error!("Hash queue closed early, skipping {}", file.path.display());
            complete_failed(file, &done_tx, counters);
        }
    }
    // End of work: workers exit once the queue is drained.
    drop(job_tx);

    std::thread::scope(|scope| {
        for id in 0..workers {
            let jobs = job_rx.clone();
            let done = done_tx.clone();
            scope.spawn(move || run_worker(id, &jobs, &done, hasher, counters, config));
        }
    });

    // Drop the orchestrator's handles so the result channel reports closed
    // once drained.
    drop(job_rx);
    drop(done_tx);

    let mut output = PoolOutput {
        files: Vec::with_capacity(total),
        ..Default::default()
    };
    for completed in done_rx.iter() {
        match completed.error {
            Some(error) => output.errors.push(error),
            None => output.bytes_hashed += completed.file.size,
        }
        output.files.push(completed.file);
    }

    if let Some(callback) = config.progress_callback {
        callback.on_phase_end(PHASE_HASHING);
    }

    log::info!(
        "Hashing complete: {} files, {} failed, {} bytes in {:.2?}",
        output.files.len(),
        output.errors.len(),
        output.bytes_hashed,
        start.elapsed()
    );

    output
}

/// Worker loop: take jobs until the queue is closed and empty.
fn run_worker(
    id: usize,
    jobs: &Receiver<FileRecord>,
    done: &Sender<Completed>,
    hasher: &Hasher,
    counters: &ScanCounters,
    config: PoolConfig<'_>,
) {
    log::trace!("Hash worker {} started", id);
    let mut processed = 0usize;

    while let Ok(mut file) = jobs.recv() {
        if file.size > LARGE_FILE_THRESHOLD {
            log::debug!(
                "Hashing large file ({} MB): {}",
                file.size / (1024 * 1024),
                file.path.display()
            );
        }

        let error = match hasher.full_hash(&file.path) {
            Ok(hex) => {
                log::trace!("Hashed {}", file.path.display());
                file.digest = ContentDigest::Computed(hex);
                None
            }
            Err(e) => {
                log::warn!("Failed to hash {}: {}", file.path.display(), e);
                file.digest = ContentDigest::Failed;
                counters.record_error();
                Some(e)
            }
        };

        let current = counters.record_hashed();
        if let Some(callback) = config.progress_callback {
            callback.on_progress(current, file.path.to_string_lossy().as_ref());
        }

        processed += 1;
        if done.send(Completed { file, error }).is_err() {
            log::error!("Hash worker {}: result channel closed", id);
            break;
        }
    }

    log::trace!("Hash worker {} exiting after {} files", id, processed);
}

fn complete_failed(mut file: FileRecord, done: &Sender<Completed>, counters: &ScanCounters) {
    let error = HashError::Io {
        path: file.path.clone(),
        source: std::io::Error::other("hash queue closed"),
    };
    file.digest = ContentDigest::Failed;
    counters.record_error();
    counters.record_hashed();
    let _ = done.send(Completed {
        file,
        error: Some(error),
    });
}
