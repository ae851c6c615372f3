//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Recursive directory walking using walkdir
//! - Streaming SHA-256 content hashing
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal and file discovery
//! - [`hasher`]: SHA-256 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(file) => println!("{}: {} bytes", file.path.display(), file.size),
//!         Err(e) => eprintln!("Warning: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

// Re-export main types
pub use hasher::{Hasher, DEFAULT_BUFFER_SIZE};
pub use walker::Walker;

/// State of a file's content digest.
///
/// A record starts out [`ContentDigest::Pending`] and is moved to
/// `Computed` or `Failed` exactly once, by the worker that owns it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum ContentDigest {
    /// Not hashed (yet, or never in `name_size` mode).
    #[default]
    Pending,
    /// Lowercase hexadecimal SHA-256 of the full content.
    Computed(String),
    /// Hashing failed; the file is excluded from duplicate consideration.
    Failed,
}

impl ContentDigest {
    /// The hex digest, if one was computed.
    #[must_use]
    pub fn as_hex(&self) -> Option<&str> {
        match self {
            Self::Computed(hex) => Some(hex),
            _ => None,
        }
    }

    /// Whether hashing this file failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed)
    }
}

/// Metadata for a discovered file.
///
/// Created by the walker with the digest unset. Hashing workers take
/// ownership of a record, fill in [`FileRecord::digest`] and hand it back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as produced by the walk (absolute or relative to the cwd)
    pub path: PathBuf,
    /// Final path component, lossily converted for display and reports
    pub name: String,
    /// Final path component exactly as the filesystem returned it
    pub file_name: OsString,
    /// File size in bytes
    pub size: u64,
    /// Content digest state
    pub digest: ContentDigest,
}

impl FileRecord {
    /// Create a new record with a pending digest.
    ///
    /// The name is derived from the last path component.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the file
    /// * `size` - File size in bytes
    #[must_use]
    pub fn new(path: PathBuf, size: u64) -> Self {
        let file_name = path.file_name().map(OsString::from).unwrap_or_default();
        Self {
            name: file_name.to_string_lossy().into_owned(),
            file_name,
            path,
            size,
            digest: ContentDigest::Pending,
        }
    }

    /// Builder-style setter for the digest, mostly useful in tests.
    #[must_use]
    pub fn with_digest(mut self, digest: ContentDigest) -> Self {
        self.digest = digest;
        self
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Copy, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    /// Symlink loops are reported as per-entry errors.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }
}

/// Non-fatal errors for a single entry during scanning.
///
/// These are counted and collected, never returned as a run failure.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// Permission was denied when accessing a file or directory.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// The entry disappeared between listing and stat.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// An I/O error occurred while accessing an entry.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A candidate file could not be hashed.
    #[error(transparent)]
    Hash(#[from] HashError),
}

/// Errors that can occur during file hashing.
#[derive(thiserror::Error, Debug)]
pub enum HashError {
    /// The specified file was not found.
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    /// Permission was denied when reading the file.
    #[error("Permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// An I/O error occurred while opening or reading the file.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl HashError {
    /// Classify an I/O error raised while hashing `path`.
    #[must_use]
    pub fn from_io(path: &Path, error: std::io::Error) -> Self {
        match error.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// The path that failed to hash.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::NotFound(p) | Self::PermissionDenied(p) => p,
            Self::Io { path, .. } => path,
        }
    }
}
