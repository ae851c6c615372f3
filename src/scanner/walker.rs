//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct for traversing a directory
//! tree and producing a flat list of [`FileRecord`]s for duplicate
//! detection. Only regular files are yielded.
//!
//! Per-entry failures (permission denied, entries vanishing mid-walk,
//! symlink loops when following links) are yielded as [`ScanError`] values
//! and the walk continues. Only [`Walker::validate_root`] reports problems
//! that prevent the walk from starting at all.
//!
//! # Example
//!
//! ```no_run
//! use dupescan::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.walk().filter_map(Result::ok).collect();
//! println!("Found {} files", files.len());
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{FileRecord, ScanError, WalkerConfig};

/// Reasons a walk cannot start.
#[derive(thiserror::Error, Debug)]
pub enum RootError {
    /// The root path does not exist.
    #[error("Path not found: {0}")]
    NotFound(PathBuf),

    /// The root path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The root directory exists but cannot be read.
    #[error("Cannot read {path}: {source}")]
    Unreadable {
        /// The root path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Directory walker for file discovery.
#[derive(Debug)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    ///
    /// # Arguments
    ///
    /// * `path` - Root directory to scan
    /// * `config` - Walker configuration options
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root directory of this walker.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Check that the root exists, is a directory and can be listed.
    ///
    /// # Errors
    ///
    /// Returns a [`RootError`] describing why the walk cannot start.
    pub fn validate_root(&self) -> Result<(), RootError> {
        let metadata = std::fs::metadata(&self.root).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RootError::NotFound(self.root.clone()),
            _ => RootError::Unreadable {
                path: self.root.clone(),
                source: e,
            },
        })?;

        if !metadata.is_dir() {
            return Err(RootError::NotADirectory(self.root.clone()));
        }

        std::fs::read_dir(&self.root).map_err(|e| RootError::Unreadable {
            path: self.root.clone(),
            source: e,
        })?;

        Ok(())
    }

    /// Walk the directory tree, yielding file records.
    ///
    /// Errors are yielded as [`ScanError`] values rather than stopping
    /// iteration. Directory entries within a directory are visited in
    /// file name order.
    pub fn walk(&self) -> impl Iterator<Item = Result<FileRecord, ScanError>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .filter_map(move |entry_result| match entry_result {
                Ok(entry) => {
                    let file_type = entry.file_type();

                    if file_type.is_dir() {
                        return None;
                    }

                    // Unfollowed symlinks report as symlinks, not files.
                    if !file_type.is_file() {
                        log::trace!("Skipping non-regular entry: {}", entry.path().display());
                        return None;
                    }

                    match entry.metadata() {
                        Ok(metadata) => Some(Ok(FileRecord::new(
                            entry.path().to_path_buf(),
                            metadata.len(),
                        ))),
                        Err(e) => {
                            let path = entry.path().to_path_buf();
                            Some(Err(self.handle_walk_error(path, e)))
                        }
                    }
                }
                Err(e) => {
                    let path = e
                        .path()
                        .map_or_else(|| self.root.clone(), Path::to_path_buf);
                    Some(Err(self.handle_walk_error(path, e)))
                }
            })
    }

    /// Convert a walkdir error into a [`ScanError`].
    fn handle_walk_error(&self, path: PathBuf, error: walkdir::Error) -> ScanError {
        if error.loop_ancestor().is_some() {
            log::warn!("Symlink loop at {}", path.display());
            return ScanError::Io {
                path,
                source: std::io::Error::other(error.to_string()),
            };
        }

        match error.io_error().map(std::io::Error::kind) {
            Some(ErrorKind::PermissionDenied) => {
                log::warn!("Permission denied: {}", path.display());
                ScanError::PermissionDenied(path)
            }
            Some(ErrorKind::NotFound) => {
                log::debug!("Entry vanished during walk: {}", path.display());
                ScanError::NotFound(path)
            }
            _ => {
                log::warn!("Walker error for {}: {}", path.display(), error);
                let source = error
                    .into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("walk error"));
                ScanError::Io { path, source }
            }
        }
    }
}
