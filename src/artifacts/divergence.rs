//! Ahead/behind computation
//!
//! Counts how far one commit has diverged from another by walking
//! ancestry backward in reverse chronological order. The walk from
//! `theirs` records every commit's 0-based visitation order; the walk
//! from `mine` stops at the first commit already recorded, so the cost is
//! bounded by the size of the symmetric difference plus `theirs`' history
//! up to the cutoff, not the full history of both sides.
//!
//! Tie-break for equal timestamps (and therefore for histories with
//! multiple merge bases) is the commit ID, making the order total and
//! deterministic.

use crate::areas::vcs::VcsReader;
use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};

/// How two references have diverged
///
/// `ahead` counts commits reachable from mine but not theirs; `behind`
/// counts commits reachable from theirs but not mine, up to the first
/// common ancestor met by the walk. For disjoint histories both fields
/// hold the total unique history length of their side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Divergence {
    pub ahead: usize,
    pub behind: usize,
}

impl Divergence {
    pub fn is_zero(&self) -> bool {
        self.ahead == 0 && self.behind == 0
    }

    /// Compute divergence between two reference names
    ///
    /// Fails when either name cannot be resolved to a commit.
    pub fn between_references(
        vcs: &impl VcsReader,
        mine: &str,
        theirs: &str,
    ) -> anyhow::Result<Divergence> {
        let mine_oid = vcs
            .resolve_reference(mine)?
            .with_context(|| format!("reference {} not found", mine))?;
        let theirs_oid = vcs
            .resolve_reference(theirs)?
            .with_context(|| format!("reference {} not found", theirs))?;

        Self::between(vcs, &mine_oid, &theirs_oid)
    }

    /// Compute divergence between two resolved commits
    pub fn between(
        vcs: &impl VcsReader,
        mine: &ObjectId,
        theirs: &ObjectId,
    ) -> anyhow::Result<Divergence> {
        if mine == theirs {
            return Ok(Divergence::default());
        }

        // first pass: record each of theirs' commits with its walk order,
        // which doubles as the behind count once a common commit is found
        let mut order = HashMap::<ObjectId, usize>::new();
        let mut walk = AncestryWalk::start(vcs, theirs)?;
        while let Some(commit) = walk.next()? {
            let position = order.len();
            order.insert(commit.oid, position);
        }

        // second pass: walk mine until the first commit theirs also has
        let mut ahead = 0;
        let mut walk = AncestryWalk::start(vcs, mine)?;
        while let Some(commit) = walk.next()? {
            if let Some(&behind) = order.get(&commit.oid) {
                return Ok(Divergence { ahead, behind });
            }
            ahead += 1;
        }

        // disjoint histories: report the full unique counts of each side
        Ok(Divergence {
            ahead,
            behind: order.len(),
        })
    }
}

/// A commit queued for the walk, ordered by (timestamp, oid)
#[derive(Debug, Clone, PartialEq, Eq)]
struct QueuedCommit(SlimCommit);

impl Ord for QueuedCommit {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .timestamp
            .cmp(&other.0.timestamp)
            .then_with(|| self.0.oid.cmp(&other.0.oid))
    }
}

impl PartialOrd for QueuedCommit {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Backward, reverse-chronological ancestry walk from a single tip
///
/// A commit is only enqueued when one of its immediate descendants has
/// been popped, so every visited commit follows one of its descendants.
struct AncestryWalk<'r, R: VcsReader> {
    vcs: &'r R,
    frontier: BinaryHeap<QueuedCommit>,
    enqueued: HashSet<ObjectId>,
}

impl<'r, R: VcsReader> AncestryWalk<'r, R> {
    fn start(vcs: &'r R, tip: &ObjectId) -> anyhow::Result<Self> {
        let mut walk = AncestryWalk {
            vcs,
            frontier: BinaryHeap::new(),
            enqueued: HashSet::new(),
        };
        walk.enqueue(tip)?;
        Ok(walk)
    }

    fn next(&mut self) -> anyhow::Result<Option<SlimCommit>> {
        let Some(QueuedCommit(commit)) = self.frontier.pop() else {
            return Ok(None);
        };

        #[cfg(feature = "debug_walk")]
        eprintln!(
            "walk: visiting {} ({} parent(s), {})",
            commit.oid.to_short_oid(),
            commit.parents.len(),
            commit.timestamp
        );

        for parent in &commit.parents {
            if !self.enqueued.contains(parent) {
                self.enqueue(parent)?;
            }
        }

        Ok(Some(commit))
    }

    fn enqueue(&mut self, oid: &ObjectId) -> anyhow::Result<()> {
        let commit = self.vcs.load_commit(oid)?;
        self.enqueued.insert(oid.clone());
        self.frontier.push(QueuedCommit(commit));
        Ok(())
    }
}
