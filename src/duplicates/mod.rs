//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Cheap-key candidate grouping and digest regrouping ([`groups`])
//! - Parallel content hashing on a fixed worker pool ([`pool`])
//! - Pipeline orchestration ([`finder`])

pub mod finder;
pub mod groups;
pub mod pool;

pub use finder::{DuplicateFinder, FinderConfig, FinderError, ScanSummary};
pub use groups::{
    candidate_key, final_key, group_candidates, regroup_by_digest, sort_groups, DuplicateGroup,
    GroupKey, GroupingStats, RegroupStats, ScanMode,
};
pub use pool::{hash_files, PoolConfig, PoolOutput};
