//! Candidate grouping, final regrouping and duplicate group types.
//!
//! # Overview
//!
//! Grouping happens twice in the pipeline:
//!
//! 1. [`group_candidates`] partitions the walked files by a cheap metadata
//!    key. Files alone under their key cannot have a duplicate and are
//!    dropped before anything is read from disk.
//! 2. [`regroup_by_digest`] partitions hashed files by their final key and
//!    again drops singletons. Files whose hash failed are excluded first.
//!
//! Which keys are used depends on the [`ScanMode`]:
//!
//! | Mode        | Candidate key   | Final key       |
//! |-------------|-----------------|-----------------|
//! | `name_size` | (name, size)    | (candidates are final) |
//! | `hash`      | size            | digest          |
//! | `combined`  | (name, size)    | (name, digest)  |
//!
//! # Example
//!
//! ```
//! use dupescan::duplicates::{group_candidates, ScanMode};
//! use dupescan::scanner::FileRecord;
//! use std::path::PathBuf;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/a/x.txt"), 100),
//!     FileRecord::new(PathBuf::from("/b/y.txt"), 100),
//!     FileRecord::new(PathBuf::from("/c/z.txt"), 200),
//! ];
//!
//! // Size-only pre-filter: the two 100-byte files are candidates
//! let (groups, stats) = group_candidates(files, ScanMode::Hash);
//! assert_eq!(groups.len(), 1);
//! assert_eq!(groups[0].len(), 2);
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use std::collections::HashMap;
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::scanner::FileRecord;

/// Comparison strategy, fixed for the whole run.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Same file name and size. Nothing is read from disk.
    #[value(name = "name_size", alias = "name-size")]
    NameSize,
    /// Same content (SHA-256), any name.
    #[default]
    Hash,
    /// Same file name and same content.
    Combined,
}

impl ScanMode {
    /// Whether this mode needs file content digests.
    #[must_use]
    pub fn requires_hashing(self) -> bool {
        !matches!(self, Self::NameSize)
    }
}

impl fmt::Display for ScanMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameSize => write!(f, "name_size"),
            Self::Hash => write!(f, "hash"),
            Self::Combined => write!(f, "combined"),
        }
    }
}

/// Key shared by every member of a group.
///
/// Typed rather than string-joined so no file name can collide with a
/// separator. Names are compared as raw [`OsString`]s, so two names that
/// only differ in bytes that are not valid UTF-8 never share a key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GroupKey {
    /// File name and size (candidate key for `name_size` and `combined`).
    NameSize {
        /// Exact file name
        name: OsString,
        /// Size in bytes
        size: u64,
    },
    /// Size only (candidate key for `hash`).
    Size(u64),
    /// Content digest (final key for `hash`).
    Digest(String),
    /// File name and content digest (final key for `combined`).
    NameDigest {
        /// Exact file name
        name: OsString,
        /// Lowercase hex SHA-256
        digest: String,
    },
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NameSize { name, size } => {
                write!(f, "{} ({} bytes)", name.to_string_lossy(), size)
            }
            Self::Size(size) => write!(f, "{} bytes", size),
            Self::Digest(digest) => write!(f, "sha256:{}", digest),
            Self::NameDigest { name, digest } => {
                write!(f, "{} sha256:{}", name.to_string_lossy(), digest)
            }
        }
    }
}

/// Candidate key for `file` under `mode`.
#[must_use]
pub fn candidate_key(file: &FileRecord, mode: ScanMode) -> GroupKey {
    match mode {
        ScanMode::NameSize | ScanMode::Combined => GroupKey::NameSize {
            name: file.file_name.clone(),
            size: file.size,
        },
        ScanMode::Hash => GroupKey::Size(file.size),
    }
}

/// Final key for `file` under `mode`.
///
/// Returns `None` for a hashing mode when the file has no computed digest,
/// which keeps failed files out of every final group.
#[must_use]
pub fn final_key(file: &FileRecord, mode: ScanMode) -> Option<GroupKey> {
    match mode {
        ScanMode::NameSize => Some(candidate_key(file, mode)),
        ScanMode::Hash => file
            .digest
            .as_hex()
            .map(|digest| GroupKey::Digest(digest.to_string())),
        ScanMode::Combined => file.digest.as_hex().map(|digest| GroupKey::NameDigest {
            name: file.file_name.clone(),
            digest: digest.to_string(),
        }),
    }
}

/// A set of two or more files that share a [`GroupKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Key shared by all members
    pub key: GroupKey,
    /// Member files (at least two in any emitted group)
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    /// Create a new group.
    #[must_use]
    pub fn new(key: GroupKey, files: Vec<FileRecord>) -> Self {
        Self { key, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Size of the first member. Every key implies equal sizes except a
    /// bare digest, where equal content implies equal size anyway.
    #[must_use]
    pub fn size(&self) -> u64 {
        self.files.first().map_or(0, |f| f.size)
    }

    /// Total size of all files in this group.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }

    /// Number of duplicate copies (total - 1 original).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Space taken by all copies beyond the first.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.total_size().saturating_sub(self.size())
    }

    /// Shared content digest, when the key carries one.
    #[must_use]
    pub fn digest(&self) -> Option<&str> {
        match &self.key {
            GroupKey::Digest(digest) | GroupKey::NameDigest { digest, .. } => Some(digest),
            _ => None,
        }
    }

    /// Get just the paths of files in this group.
    #[must_use]
    pub fn paths(&self) -> Vec<PathBuf> {
        self.files.iter().map(|f| f.path.clone()).collect()
    }
}

/// Statistics from the candidate grouping stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupingStats {
    /// Total number of files processed
    pub total_files: usize,
    /// Total size of all files in bytes
    pub total_size: u64,
    /// Number of distinct keys seen
    pub unique_keys: usize,
    /// Number of files in groups of 2+
    pub candidate_files: usize,
    /// Number of files dropped as alone under their key
    pub eliminated_unique: usize,
    /// Number of groups with 2+ files
    pub candidate_groups: usize,
}

impl GroupingStats {
    /// Percentage of files eliminated by grouping.
    #[must_use]
    pub fn elimination_rate(&self) -> f64 {
        if self.total_files == 0 {
            0.0
        } else {
            (self.eliminated_unique as f64 / self.total_files as f64) * 100.0
        }
    }
}

/// Statistics from the regrouping stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegroupStats {
    /// Files handed to the regrouper
    pub input_files: usize,
    /// Files skipped because their digest is missing or failed
    pub excluded_failed: usize,
    /// Groups with 2+ files after regrouping
    pub duplicate_groups: usize,
    /// Files in those groups beyond the first of each
    pub duplicate_files: usize,
}

/// Group keyed files and keep only keys with 2+ members.
///
/// Returns the groups, the number of distinct keys and the number of files
/// dropped as singletons. Members are sorted by path.
fn partition(
    keyed: impl IntoIterator<Item = (GroupKey, FileRecord)>,
) -> (Vec<DuplicateGroup>, usize, usize) {
    let mut by_key: HashMap<GroupKey, Vec<FileRecord>> = HashMap::new();
    for (key, file) in keyed {
        by_key.entry(key).or_default().push(file);
    }

    let unique_keys = by_key.len();
    let mut eliminated = 0;

    let mut groups: Vec<DuplicateGroup> = by_key
        .into_iter()
        .filter_map(|(key, mut files)| {
            if files.len() < 2 {
                eliminated += files.len();
                log::trace!("Eliminated unique key {}", key);
                return None;
            }
            files.sort_by(|a, b| a.path.cmp(&b.path));
            Some(DuplicateGroup::new(key, files))
        })
        .collect();

    sort_groups(&mut groups);
    (groups, unique_keys, eliminated)
}

/// Sort groups largest first, ties broken by first member path.
pub fn sort_groups(groups: &mut [DuplicateGroup]) {
    groups.sort_by(|a, b| {
        b.size()
            .cmp(&a.size())
            .then_with(|| a.files.first().map(|f| &f.path).cmp(&b.files.first().map(|f| &f.path)))
    });
}

/// Partition files by the cheap candidate key for `mode`.
///
/// No file content is read. Only groups with at least two members are
/// returned.
///
/// # Arguments
///
/// * `files` - Files produced by the walk
/// * `mode` - Active comparison mode
///
/// # Returns
///
/// A tuple of:
/// - `Vec<DuplicateGroup>` - Candidate groups (2+ files each)
/// - `GroupingStats` - Statistics about the grouping operation
#[must_use]
pub fn group_candidates(
    files: impl IntoIterator<Item = FileRecord>,
    mode: ScanMode,
) -> (Vec<DuplicateGroup>, GroupingStats) {
    let mut stats = GroupingStats::default();

    let keyed = files.into_iter().map(|file| {
        stats.total_files += 1;
        stats.total_size += file.size;
        (candidate_key(&file, mode), file)
    });
    let (groups, unique_keys, eliminated) = partition(keyed);

    stats.unique_keys = unique_keys;
    stats.eliminated_unique = eliminated;
    stats.candidate_groups = groups.len();
    stats.candidate_files = groups.iter().map(DuplicateGroup::len).sum();

    for group in &groups {
        log::debug!("Candidate group {}: {} files", group.key, group.len());
    }

    log::debug!(
        "Candidate grouping ({}): {} files → {} candidates in {} groups ({:.1}% eliminated)",
        mode,
        stats.total_files,
        stats.candidate_files,
        stats.candidate_groups,
        stats.elimination_rate()
    );

    (groups, stats)
}

/// Partition hashed files by the final key for `mode`.
///
/// Files without a computed digest are excluded before grouping. Only
/// groups with at least two members are returned.
#[must_use]
pub fn regroup_by_digest(
    files: impl IntoIterator<Item = FileRecord>,
    mode: ScanMode,
) -> (Vec<DuplicateGroup>, RegroupStats) {
    let mut stats = RegroupStats::default();

    let keyed = files.into_iter().filter_map(|file| {
        stats.input_files += 1;
        match final_key(&file, mode) {
            Some(key) => Some((key, file)),
            None => {
                stats.excluded_failed += 1;
                log::trace!("Excluding unhashed file: {}", file.path.display());
                None
            }
        }
    });
    let (groups, _, _) = partition(keyed);

    stats.duplicate_groups = groups.len();
    stats.duplicate_files = groups.iter().map(DuplicateGroup::duplicate_count).sum();

    for group in &groups {
        log::debug!(
            "Duplicate group {}: {} files, {} bytes each",
            group.key,
            group.len(),
            group.size()
        );
    }

    (groups, stats)
}
