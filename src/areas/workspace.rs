//! Working tree access
//!
//! Listing, stat-ing and hashing files in the worktree. Everything is
//! read-only; paths handed back from [`Workspace::list_dir`] are
//! absolute, and [`Workspace::relativize`] maps them back under the
//! worktree root.

use crate::areas::index::EntryMetadata;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use is_executable::IsExecutable;
use std::os::unix::prelude::MetadataExt;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

const IGNORED_PATHS: [&str; 3] = [".git", ".", ".."];

const REGULAR_MODE: u32 = 0o100644;
const EXECUTABLE_MODE: u32 = 0o100755;

#[derive(Debug)]
pub struct Workspace {
    path: Box<Path>,
}

impl Workspace {
    pub fn new(path: Box<Path>) -> Self {
        Workspace { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// List a directory's children (absolute paths), skipping `.git`
    pub fn list_dir(&self, dir_path: Option<&Path>) -> anyhow::Result<Vec<PathBuf>> {
        let dir_path = match dir_path {
            Some(p) => p.to_path_buf(),
            None => self.path.to_path_buf(),
        };

        if !dir_path.is_dir() {
            anyhow::bail!("The specified path is not a directory: {:?}", dir_path);
        }

        let mut children = std::fs::read_dir(&dir_path)
            .with_context(|| format!("failed to list {}", dir_path.display()))?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| self.is_not_ignored(path))
            .collect::<Vec<_>>();
        children.sort();

        Ok(children)
    }

    /// Strip the worktree root from an absolute path
    pub fn relativize(&self, path: &Path) -> anyhow::Result<PathBuf> {
        Ok(path
            .strip_prefix(&self.path)
            .with_context(|| format!("{} is outside the worktree", path.display()))?
            .to_path_buf())
    }

    /// Stat a file into index-comparable metadata
    pub fn stat_file(&self, path: &Path) -> anyhow::Result<EntryMetadata> {
        let stat = std::fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;

        let mode = if path.is_executable() {
            EXECUTABLE_MODE
        } else {
            REGULAR_MODE
        };

        Ok(EntryMetadata {
            ctime: stat.ctime() as u32,
            ctime_nsec: stat.ctime_nsec() as u32,
            mtime: stat.mtime() as u32,
            mtime_nsec: stat.mtime_nsec() as u32,
            dev: stat.dev() as u32,
            ino: stat.ino() as u32,
            mode,
            uid: stat.uid(),
            gid: stat.gid(),
            size: stat.size() as u32,
        })
    }

    /// Hash a file's content the way the object database would
    pub fn hash_blob(&self, path: &Path) -> anyhow::Result<ObjectId> {
        let content = std::fs::read(path)
            .with_context(|| format!("failed to read {}", path.display()))?;

        let mut object = Vec::with_capacity(content.len() + 16);
        object.extend_from_slice(format!("blob {}\0", content.len()).as_bytes());
        object.extend_from_slice(&content);

        Ok(ObjectId::hash_of(&object))
    }

    /// Whether `path` transitively contains at least one regular file
    pub fn contains_any_file(&self, path: &Path) -> bool {
        WalkDir::new(path)
            .into_iter()
            .filter_entry(|entry| self.is_not_ignored(entry.path()))
            .filter_map(|entry| entry.ok())
            .any(|entry| entry.file_type().is_file())
    }

    fn is_not_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| !IGNORED_PATHS.contains(&name))
            .unwrap_or(false)
    }
}
