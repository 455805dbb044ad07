//! Change-record enumeration
//!
//! Walks the worktree, the index and the HEAD tree and emits one
//! [`ChangeRecord`] per changed path, each carrying both status axes
//! (index vs HEAD, worktree vs index). The pure aggregation into counters
//! lives in [`crate::artifacts::status::classifier`].

use crate::areas::database::Database;
use crate::areas::index::{ConflictStages, EntryMetadata, Index, IndexEntry};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::DatabaseEntry;
use crate::artifacts::status::{ChangeRecord, ChangeStatus};
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

#[derive(new)]
pub struct StatusScan<'r> {
    workspace: &'r Workspace,
    database: &'r Database,
    index: &'r Index,
    /// The commit HEAD resolves to; `None` for an unborn branch
    head_oid: Option<&'r ObjectId>,
}

/// Both axes of one path, accumulated during the scan
#[derive(Debug, Clone, Default)]
struct FileChange {
    index_status: ChangeStatus,
    worktree_status: ChangeStatus,
}

impl<'r> StatusScan<'r> {
    /// Enumerate every changed path with both of its status axes
    pub fn change_records(&self) -> anyhow::Result<Vec<ChangeRecord>> {
        let mut untracked = BTreeSet::<PathBuf>::new();
        let mut file_stats = BTreeMap::<PathBuf, EntryMetadata>::new();

        self.scan_workspace(None, &mut untracked, &mut file_stats)?;
        let head_tree = self.load_head_tree()?;

        let mut changed = BTreeMap::<PathBuf, FileChange>::new();

        for entry in self.index.entries() {
            self.check_entry_against_workspace(entry, &file_stats, &mut changed)?;
            self.check_entry_against_head_tree(entry, &head_tree, &mut changed);
        }
        self.collect_deleted_head_files(&head_tree, &mut changed);

        for (path, stages) in self.index.conflicts() {
            changed.insert(path.clone(), Self::conflict_change(stages));
        }

        for path in untracked {
            changed.entry(path).or_default().worktree_status = ChangeStatus::Untracked;
        }

        Ok(changed
            .into_iter()
            .map(|(path, change)| {
                ChangeRecord::new(path, change.index_status, change.worktree_status)
            })
            .collect())
    }

    fn scan_workspace(
        &self,
        prefix_path: Option<&Path>,
        untracked: &mut BTreeSet<PathBuf>,
        file_stats: &mut BTreeMap<PathBuf, EntryMetadata>,
    ) -> anyhow::Result<()> {
        let children = self.workspace.list_dir(prefix_path)?;

        for path in children.iter() {
            let relative = self.workspace.relativize(path)?;

            if self.index.is_directly_tracked(&relative) {
                if path.is_dir() {
                    self.scan_workspace(Some(path), untracked, file_stats)?;
                } else {
                    let stat = self.workspace.stat_file(path)?;
                    file_stats.insert(relative, stat);
                }
            } else if self.is_listable_untracked(path) {
                // report a whole untracked directory as one entry with a
                // trailing separator, without descending into it
                let relative = if path.is_dir() {
                    let mut p = relative;
                    p.push("");
                    p
                } else {
                    relative
                };
                untracked.insert(relative);
            }
        }

        Ok(())
    }

    /// A file is always listable; a directory only when it transitively
    /// contains at least one file (empty directory trees stay invisible)
    fn is_listable_untracked(&self, path: &Path) -> bool {
        path.is_file() || self.workspace.contains_any_file(path)
    }

    fn load_head_tree(&self) -> anyhow::Result<BTreeMap<PathBuf, DatabaseEntry>> {
        let mut head_tree = BTreeMap::<PathBuf, DatabaseEntry>::new();

        if let Some(head_oid) = self.head_oid {
            let commit = self.database.load_commit(head_oid)?;
            self.database
                .flatten_tree(&commit.tree_oid, None, &mut head_tree)?;
        }

        Ok(head_tree)
    }

    fn check_entry_against_workspace(
        &self,
        entry: &IndexEntry,
        file_stats: &BTreeMap<PathBuf, EntryMetadata>,
        changed: &mut BTreeMap<PathBuf, FileChange>,
    ) -> anyhow::Result<()> {
        let status = match file_stats.get(&entry.name) {
            None => ChangeStatus::Deleted,
            Some(stat) if !entry.stat_match(stat) => ChangeStatus::Modified,
            Some(stat) if entry.times_match(stat) => ChangeStatus::Unmodified,
            Some(_) => {
                // timestamps moved but size/mode agree: compare content
                let absolute = self.workspace.path().join(&entry.name);
                if self.workspace.hash_blob(&absolute)? != entry.oid {
                    ChangeStatus::Modified
                } else {
                    ChangeStatus::Unmodified
                }
            }
        };

        if status != ChangeStatus::Unmodified {
            changed.entry(entry.name.clone()).or_default().worktree_status = status;
        }

        Ok(())
    }

    fn check_entry_against_head_tree(
        &self,
        entry: &IndexEntry,
        head_tree: &BTreeMap<PathBuf, DatabaseEntry>,
        changed: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        let status = match head_tree.get(&entry.name) {
            None => ChangeStatus::Added,
            Some(head_entry)
                if head_entry.mode != entry.metadata.mode || head_entry.oid != entry.oid =>
            {
                ChangeStatus::Modified
            }
            Some(_) => ChangeStatus::Unmodified,
        };

        if status != ChangeStatus::Unmodified {
            changed.entry(entry.name.clone()).or_default().index_status = status;
        }
    }

    fn collect_deleted_head_files(
        &self,
        head_tree: &BTreeMap<PathBuf, DatabaseEntry>,
        changed: &mut BTreeMap<PathBuf, FileChange>,
    ) {
        for path in head_tree.keys() {
            if self.index.entry_by_path(path).is_none() && !self.index.conflicts().contains_key(path)
            {
                changed.entry(path.clone()).or_default().index_status = ChangeStatus::Deleted;
            }
        }
    }

    /// Map a conflicted path's stage set onto the two status axes
    fn conflict_change(stages: &ConflictStages) -> FileChange {
        let index_side = stages.index_side_changed();
        let worktree_side = stages.worktree_side_changed();

        // a degenerate stage set with no visible diff still reads as a
        // conflict on both sides
        let (index_side, worktree_side) = if !index_side && !worktree_side {
            (true, true)
        } else {
            (index_side, worktree_side)
        };

        FileChange {
            index_status: if index_side {
                ChangeStatus::Conflicted
            } else {
                ChangeStatus::Unmodified
            },
            worktree_status: if worktree_side {
                ChangeStatus::Conflicted
            } else {
                ChangeStatus::Unmodified
            },
        }
    }
}
