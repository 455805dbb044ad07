//! Git references (branches, HEAD, packed refs)
//!
//! This module reads references: human-readable names pointing to commits.
//! References can be:
//! - Direct: containing a commit SHA-1
//! - Symbolic: pointing to another reference (e.g., HEAD -> refs/heads/main)
//!
//! Loose refs are text files under `.git`; refs that have been packed are
//! looked up in `.git/packed-refs`. Everything here is read-only.

use crate::areas::vcs::HeadState;
use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::Path;

/// Regex pattern for parsing symbolic references
const SYMREF_REGEX: &str = r"^ref: (.+)$";

/// Prefix stripped from branch refs for display
const HEADS_PREFIX: &str = "refs/heads/";

/// Branch names probed for the local default branch, in order
const DEFAULT_BRANCH_CANDIDATES: [&str; 2] = ["main", "master"];

/// Git references reader
///
/// Resolves HEAD and named references against the loose ref files and the
/// packed-refs file.
#[derive(Debug, new)]
pub struct Refs {
    /// Path to the git directory (typically `.git`)
    path: Box<Path>,
}

/// A reference file's content: another reference or a direct object ID
#[derive(Debug, Clone)]
enum SymRefOrOid {
    SymRef { sym_ref_name: String },
    Oid(ObjectId),
}

impl SymRefOrOid {
    fn read_symref_or_oid(path: &Path) -> anyhow::Result<Option<SymRefOrOid>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)?;
        let content = content.trim();

        if content.is_empty() {
            return Ok(None);
        }

        let symref_match = regex::Regex::new(SYMREF_REGEX)?.captures(content);
        if let Some(symref_match) = symref_match {
            Ok(Some(SymRefOrOid::SymRef {
                sym_ref_name: symref_match[1].to_string(),
            }))
        } else {
            Ok(Some(SymRefOrOid::Oid(ObjectId::try_parse(
                content.to_string(),
            )?)))
        }
    }
}

impl Refs {
    /// Determine where HEAD points, detecting unborn and detached states
    pub fn head_state(&self) -> anyhow::Result<HeadState> {
        let head = SymRefOrOid::read_symref_or_oid(&self.head_path())?
            .context("repository has no HEAD")?;

        match head {
            SymRefOrOid::Oid(oid) => Ok(HeadState::Detached { oid }),
            SymRefOrOid::SymRef { sym_ref_name } => {
                let branch = sym_ref_name
                    .strip_prefix(HEADS_PREFIX)
                    .unwrap_or(&sym_ref_name)
                    .to_string();

                match self.resolve(&sym_ref_name)? {
                    Some(oid) => Ok(HeadState::OnBranch { branch, oid }),
                    None => Ok(HeadState::Unborn { branch }),
                }
            }
        }
    }

    /// Resolve a reference name to a commit ID
    ///
    /// Probes `.git/<name>`, `.git/refs/<name>` and `.git/refs/heads/<name>`
    /// as loose files (following symbolic indirection), then falls back to
    /// the packed-refs file.
    ///
    /// # Returns
    ///
    /// `Ok(None)` when no reference of that name exists anywhere.
    pub fn resolve(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let candidate = [self.path.clone(), self.refs_path(), self.heads_path()]
            .iter()
            .map(|base_path| base_path.join(name))
            .find(|path| path.exists());

        if let Some(path) = candidate
            && let Some(oid) = self.read_symref(&path)?
        {
            return Ok(Some(oid));
        }

        self.packed_oid(name)
    }

    /// The local default branch ref (`main`, then `master`), if present
    pub fn default_branch(&self) -> anyhow::Result<Option<String>> {
        for candidate in DEFAULT_BRANCH_CANDIDATES {
            let full_name = format!("{}{}", HEADS_PREFIX, candidate);
            if self.resolve(&full_name)?.is_some() {
                return Ok(Some(full_name));
            }
        }

        Ok(None)
    }

    /// Read a symbolic reference, following indirection until an OID
    fn read_symref(&self, path: &Path) -> anyhow::Result<Option<ObjectId>> {
        let ref_content = SymRefOrOid::read_symref_or_oid(path)?;

        match ref_content {
            Some(SymRefOrOid::SymRef { sym_ref_name }) => {
                let target = self.path.join(&sym_ref_name);
                if target.exists() {
                    self.read_symref(&target)
                } else {
                    self.packed_oid(&sym_ref_name)
                }
            }
            Some(SymRefOrOid::Oid(oid)) => Ok(Some(oid)),
            None => Ok(None),
        }
    }

    /// Look a reference up in `.git/packed-refs`
    ///
    /// Lines are `<hex40> <refname>`; peeled tag lines (`^...`) and
    /// comments are skipped. Short branch names match their
    /// `refs/heads/` form.
    fn packed_oid(&self, name: &str) -> anyhow::Result<Option<ObjectId>> {
        let packed_path = self.path.join("packed-refs");
        if !packed_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&packed_path)
            .with_context(|| format!("failed to read {}", packed_path.display()))?;
        let full_name = format!("{}{}", HEADS_PREFIX, name);

        for line in content.lines() {
            if line.starts_with('#') || line.starts_with('^') {
                continue;
            }

            if let Some((hex, ref_name)) = line.split_once(' ')
                && (ref_name == name || ref_name == full_name)
            {
                return Ok(Some(ObjectId::try_parse(hex.to_string())?));
            }
        }

        Ok(None)
    }

    pub fn head_path(&self) -> Box<Path> {
        self.path.join("HEAD").into_boxed_path()
    }

    pub fn refs_path(&self) -> Box<Path> {
        self.path.join("refs").into_boxed_path()
    }

    pub fn heads_path(&self) -> Box<Path> {
        self.refs_path().join("heads").into_boxed_path()
    }
}
