//! Per-path change records
//!
//! Each changed path carries two independent status codes: how the index
//! differs from HEAD (staged side) and how the worktree differs from the
//! index (unstaged side). A single path may have both set at once, e.g. a
//! file staged as new and then edited again.

use derive_new::new;
use std::path::PathBuf;

/// One status axis of a changed path
///
/// The same vocabulary serves both axes; `Untracked` is only ever
/// produced on the worktree axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum ChangeStatus {
    #[default]
    Unmodified,
    Untracked,
    Added,
    Modified,
    Deleted,
    Renamed,
    Copied,
    Conflicted,
}

impl From<&ChangeStatus> for &str {
    fn from(status: &ChangeStatus) -> Self {
        match status {
            ChangeStatus::Unmodified => " ",
            ChangeStatus::Untracked => "?",
            ChangeStatus::Added => "A",
            ChangeStatus::Modified => "M",
            ChangeStatus::Deleted => "D",
            ChangeStatus::Renamed => "R",
            ChangeStatus::Copied => "C",
            ChangeStatus::Conflicted => "U",
        }
    }
}

/// A changed path with both of its status axes
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct ChangeRecord {
    /// Path relative to the worktree root
    pub path: PathBuf,
    /// Index vs HEAD (staged side)
    pub index_status: ChangeStatus,
    /// Worktree vs index (unstaged side)
    pub worktree_status: ChangeStatus,
}

impl ChangeRecord {
    pub fn is_conflicted(&self) -> bool {
        self.index_status == ChangeStatus::Conflicted
            || self.worktree_status == ChangeStatus::Conflicted
    }
}
