//! VCS access capability interface
//!
//! Everything the prompt core needs from the underlying repository access
//! layer, as one trait: reference resolution, ancestry, head-state
//! detection, change-record enumeration and upstream lookup. The on-disk
//! backend lives in [`crate::areas::repository`]; unit tests drive the
//! core through an in-memory fake instead.

use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::ChangeRecord;

/// Where HEAD currently points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadState {
    /// HEAD names a branch with no commits yet
    Unborn { branch: String },
    /// HEAD points at a commit directly
    Detached { oid: ObjectId },
    /// HEAD names a branch with at least one commit
    OnBranch { branch: String, oid: ObjectId },
}

/// Read-only repository access
pub trait VcsReader {
    /// Resolve a reference name (short branch name or full ref path) to a
    /// commit. `Ok(None)` means the reference does not exist, which is a
    /// normal state for the prompt, not a failure.
    fn resolve_reference(&self, name: &str) -> anyhow::Result<Option<ObjectId>>;

    /// Load a commit's ancestry projection (parents + timestamp)
    fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit>;

    /// Detect where HEAD points, including unborn and detached states
    fn head(&self) -> anyhow::Result<HeadState>;

    /// Enumerate every changed path with both of its status axes.
    /// An empty set is a valid result; only unreadable repository
    /// metadata is an error.
    fn change_records(&self) -> anyhow::Result<Vec<ChangeRecord>>;

    /// The tracking reference configured for the current branch, if any
    fn upstream_reference(&self) -> anyhow::Result<Option<String>>;

    /// The local default branch ref, if one exists
    fn default_branch(&self) -> anyhow::Result<Option<String>>;
}
