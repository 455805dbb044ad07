//! Status classification
//!
//! Reduces the unordered set of change records into the aggregate the
//! renderer consumes. One pure pass, no repository access: each record's
//! two axes are examined independently, so a partially staged file feeds
//! one staged and one unstaged bucket without double counting either.

use crate::artifacts::status::change_record::{ChangeRecord, ChangeStatus};

/// Which sides of a merge touched a conflicted path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConflictKind {
    /// Both the staged (incoming) and worktree (local) sides changed
    Both,
    /// Only the worktree side changed
    Ours,
    /// Only the staged side changed
    Theirs,
}

/// Aggregate working-tree state
///
/// Counters are grouped by side (staged vs unstaged) and change kind.
/// The sum over counters can exceed the number of records, since one
/// record may contribute to one staged and one unstaged bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepoState {
    pub untracked: usize,
    pub staged_added: usize,
    pub staged_modified: usize,
    pub staged_deleted: usize,
    pub staged_renamed: usize,
    pub unstaged_modified: usize,
    pub unstaged_deleted: usize,
    pub unstaged_renamed: usize,
    pub conflict_both: usize,
    pub conflict_ours: usize,
    pub conflict_theirs: usize,
}

impl RepoState {
    /// Reduce change records into aggregate counters
    pub fn classify<'a>(records: impl IntoIterator<Item = &'a ChangeRecord>) -> Self {
        records
            .into_iter()
            .fold(RepoState::default(), |state, record| state.absorb(record))
    }

    fn absorb(mut self, record: &ChangeRecord) -> Self {
        if record.is_conflicted() {
            // Exactly one conflict sub-kind per conflicted path, decided by
            // which axes carry a non-empty diff
            match (
                record.index_status == ChangeStatus::Conflicted,
                record.worktree_status == ChangeStatus::Conflicted,
            ) {
                (true, true) => self.conflict_both += 1,
                (false, true) => self.conflict_ours += 1,
                (true, false) => self.conflict_theirs += 1,
                (false, false) => unreachable!("is_conflicted checked above"),
            }
            return self;
        }

        match record.index_status {
            ChangeStatus::Added => self.staged_added += 1,
            ChangeStatus::Modified => self.staged_modified += 1,
            ChangeStatus::Deleted => self.staged_deleted += 1,
            // No dedicated copy counter; copies read as renames
            ChangeStatus::Renamed | ChangeStatus::Copied => self.staged_renamed += 1,
            _ => {}
        }

        match record.worktree_status {
            ChangeStatus::Untracked => self.untracked += 1,
            ChangeStatus::Modified => self.unstaged_modified += 1,
            ChangeStatus::Deleted => self.unstaged_deleted += 1,
            ChangeStatus::Renamed | ChangeStatus::Copied => self.unstaged_renamed += 1,
            _ => {}
        }

        self
    }

    /// The single conflict category to display, if any
    /// (precedence: both > ours > theirs)
    pub fn conflict(&self) -> Option<(ConflictKind, usize)> {
        if self.conflict_both > 0 {
            Some((ConflictKind::Both, self.conflict_both))
        } else if self.conflict_ours > 0 {
            Some((ConflictKind::Ours, self.conflict_ours))
        } else if self.conflict_theirs > 0 {
            Some((ConflictKind::Theirs, self.conflict_theirs))
        } else {
            None
        }
    }

    pub fn is_clean(&self) -> bool {
        *self == RepoState::default()
    }
}
