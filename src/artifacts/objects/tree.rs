//! Git tree object
//!
//! Trees map names to blobs and subtrees. The prompt flattens the HEAD
//! commit's tree into `path -> (mode, oid)` to diff against the index.
//!
//! ## Format
//!
//! Each entry is `<octal mode> <name>\0<20-byte oid>`, concatenated.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use derive_new::new;
use std::path::PathBuf;

/// Mode bits marking a tree entry as a subtree
pub const TREE_MODE: u32 = 0o40000;

/// One parsed tree entry
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct TreeEntry {
    pub name: String,
    pub mode: u32,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.mode == TREE_MODE
    }
}

/// A flattened HEAD-tree entry: the blob a path points at and its mode
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct DatabaseEntry {
    pub oid: ObjectId,
    pub mode: u32,
}

/// Parse a tree body (header already stripped) into its entries
pub fn parse_entries(body: &[u8]) -> anyhow::Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();
    let mut rest = body;

    while !rest.is_empty() {
        let space = rest
            .iter()
            .position(|&b| b == b' ')
            .context("Invalid tree object: missing mode separator")?;
        let mode = std::str::from_utf8(&rest[..space])?;
        let mode = u32::from_str_radix(mode, 8).context("Invalid tree object: bad mode")?;
        rest = &rest[space + 1..];

        let nul = rest
            .iter()
            .position(|&b| b == 0)
            .context("Invalid tree object: missing name terminator")?;
        let name = std::str::from_utf8(&rest[..nul])
            .context("Invalid tree object: non-utf8 name")?
            .to_string();
        rest = &rest[nul + 1..];

        anyhow::ensure!(rest.len() >= 20, "Invalid tree object: truncated oid");
        let oid = ObjectId::from_bytes(&rest[..20])?;
        rest = &rest[20..];

        entries.push(TreeEntry::new(name, mode, oid));
    }

    Ok(entries)
}

/// Join a tree-entry name onto the path prefix accumulated so far
pub fn join_prefix(prefix: Option<&PathBuf>, name: &str) -> PathBuf {
    match prefix {
        Some(prefix) => prefix.join(name),
        None => PathBuf::from(name),
    }
}
