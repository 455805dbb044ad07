//! Repository discovery and the on-disk `VcsReader` backend
//!
//! Discovery walks parent directories from a starting point until it
//! finds a `.git` directory, a `.git` file pointing elsewhere (linked
//! worktrees, submodules), or a directory that is itself a bare git
//! directory. Reaching the filesystem root without a hit is a normal
//! outcome, not an error.

use crate::areas::config::Config;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::refs::Refs;
use crate::areas::status::StatusScan;
use crate::areas::vcs::{HeadState, VcsReader};
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::ChangeRecord;
use anyhow::Context;
use std::path::{Path, PathBuf};

pub struct Repository {
    /// `None` for a bare repository
    workspace: Option<Workspace>,
    database: Database,
    refs: Refs,
    config: Config,
    index: Index,
}

impl Repository {
    /// Walk upward from `start` looking for an enclosing repository
    ///
    /// # Returns
    ///
    /// `Ok(None)` when the walk reaches the filesystem root without
    /// finding one.
    pub fn discover(start: &Path) -> anyhow::Result<Option<Self>> {
        let mut dir = start
            .canonicalize()
            .with_context(|| format!("cannot resolve {}", start.display()))?;

        loop {
            let dot_git = dir.join(".git");

            if dot_git.is_dir() {
                return Ok(Some(Self::open(
                    dot_git.into_boxed_path(),
                    Some(dir.into_boxed_path()),
                )?));
            }
            if dot_git.is_file() {
                let git_dir = Self::follow_gitfile(&dot_git, &dir)?;
                return Ok(Some(Self::open(
                    git_dir.into_boxed_path(),
                    Some(dir.into_boxed_path()),
                )?));
            }
            if Self::looks_bare(&dir) {
                return Ok(Some(Self::open(dir.into_boxed_path(), None)?));
            }

            let parent = dir.parent().map(|p| p.to_path_buf());
            match parent {
                Some(parent) => dir = parent,
                None => return Ok(None),
            }
        }
    }

    fn open(git_dir: Box<Path>, worktree: Option<Box<Path>>) -> anyhow::Result<Self> {
        let database = Database::new(git_dir.join("objects").into_boxed_path());
        let config = Config::new(git_dir.join("config").into_boxed_path());

        let mut index = Index::new(git_dir.join("index").into_boxed_path());
        index.rehydrate()?;
        let refs = Refs::new(git_dir);

        Ok(Repository {
            workspace: worktree.map(Workspace::new),
            database,
            refs,
            config,
            index,
        })
    }

    /// Resolve a `.git` file's `gitdir: <path>` indirection
    fn follow_gitfile(dot_git: &Path, containing_dir: &Path) -> anyhow::Result<PathBuf> {
        let content = std::fs::read_to_string(dot_git)
            .with_context(|| format!("failed to read {}", dot_git.display()))?;
        let target = content
            .trim()
            .strip_prefix("gitdir:")
            .with_context(|| format!("{} is not a gitdir link", dot_git.display()))?
            .trim();

        let target = PathBuf::from(target);
        let target = if target.is_absolute() {
            target
        } else {
            containing_dir.join(target)
        };

        target
            .canonicalize()
            .with_context(|| format!("gitdir link target {} is unreadable", target.display()))
    }

    /// A directory that carries the git-dir layout itself (bare repository)
    fn looks_bare(dir: &Path) -> bool {
        dir.join("HEAD").is_file() && dir.join("objects").is_dir() && dir.join("refs").is_dir()
    }

    pub fn is_bare(&self) -> bool {
        self.workspace.is_none()
    }
}

impl VcsReader for Repository {
    fn resolve_reference(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        self.refs.resolve(name)
    }

    fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        self.database.load_commit(oid)
    }

    fn head(&self) -> anyhow::Result<HeadState> {
        self.refs.head_state()
    }

    fn change_records(&self) -> anyhow::Result<Vec<ChangeRecord>> {
        let workspace = self
            .workspace
            .as_ref()
            .context("a bare repository has no working tree to scan")?;

        let head_oid = match self.refs.head_state()? {
            HeadState::OnBranch { oid, .. } | HeadState::Detached { oid } => Some(oid),
            HeadState::Unborn { .. } => None,
        };

        StatusScan::new(workspace, &self.database, &self.index, head_oid.as_ref())
            .change_records()
    }

    fn upstream_reference(&self) -> anyhow::Result<Option<String>> {
        match self.refs.head_state()? {
            HeadState::OnBranch { branch, .. } | HeadState::Unborn { branch } => {
                self.config.upstream_of(&branch)
            }
            HeadState::Detached { .. } => Ok(None),
        }
    }

    fn default_branch(&self) -> anyhow::Result<Option<String>> {
        self.refs.default_branch()
    }
}
