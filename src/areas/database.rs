//! Read-only loose-object database
//!
//! Objects live zlib-compressed under `.git/objects/XX/YYYY...` with a
//! `<type> <size>\0` header. The prompt only ever loads commits (for
//! ancestry walks) and trees (to flatten the HEAD snapshot); packfiles are
//! not supported.

use crate::artifacts::objects::ObjectType;
use crate::artifacts::objects::commit::SlimCommit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{DatabaseEntry, TreeEntry, join_prefix, parse_entries};
use anyhow::Context;
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: Box<Path>,
}

impl Database {
    pub fn new(path: Box<Path>) -> Self {
        Database { path }
    }

    /// Load a commit's ancestry projection
    pub fn load_commit(&self, oid: &ObjectId) -> anyhow::Result<SlimCommit> {
        let (object_type, content) = self.read_object(oid)?;
        anyhow::ensure!(
            object_type == ObjectType::Commit,
            "object {} is a {}, expected a commit",
            oid,
            object_type.as_str()
        );

        let body = std::str::from_utf8(&content)
            .with_context(|| format!("commit {} is not valid utf-8", oid))?;
        SlimCommit::parse(oid.clone(), body)
    }

    /// Load a tree's direct entries
    pub fn load_tree(&self, oid: &ObjectId) -> anyhow::Result<Vec<TreeEntry>> {
        let (object_type, content) = self.read_object(oid)?;
        anyhow::ensure!(
            object_type == ObjectType::Tree,
            "object {} is a {}, expected a tree",
            oid,
            object_type.as_str()
        );

        parse_entries(&content)
    }

    /// Flatten a tree recursively into `path -> (mode, oid)`
    pub fn flatten_tree(
        &self,
        oid: &ObjectId,
        prefix: Option<&PathBuf>,
        entries: &mut BTreeMap<PathBuf, DatabaseEntry>,
    ) -> anyhow::Result<()> {
        for entry in self.load_tree(oid)? {
            let path = join_prefix(prefix, &entry.name);

            if entry.is_tree() {
                self.flatten_tree(&entry.oid, Some(&path), entries)?;
            } else {
                entries.insert(path, DatabaseEntry::new(entry.oid, entry.mode));
            }
        }

        Ok(())
    }

    fn read_object(&self, oid: &ObjectId) -> anyhow::Result<(ObjectType, Bytes)> {
        let object_path = self.path.join(oid.to_path());
        let compressed = std::fs::read(&object_path).with_context(|| {
            format!("Unable to read object file {}", object_path.display())
        })?;

        let content = Self::decompress(&compressed)?;

        // split "<type> <size>\0" header from the body
        let nul = content
            .iter()
            .position(|&b| b == 0)
            .with_context(|| format!("object {} has no header terminator", oid))?;
        let header = std::str::from_utf8(&content[..nul])
            .with_context(|| format!("object {} has a non-utf8 header", oid))?;
        let (type_str, size_str) = header
            .split_once(' ')
            .with_context(|| format!("object {} has a malformed header", oid))?;

        let object_type = ObjectType::try_parse(type_str)?;
        let size = size_str
            .parse::<usize>()
            .with_context(|| format!("object {} has a malformed size", oid))?;
        let body = Bytes::copy_from_slice(&content[nul + 1..]);
        anyhow::ensure!(
            body.len() == size,
            "object {} is truncated: header says {} bytes, got {}",
            oid,
            size,
            body.len()
        );

        Ok((object_type, body))
    }

    fn decompress(data: &[u8]) -> anyhow::Result<Vec<u8>> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder
            .read_to_end(&mut decompressed_content)
            .context("Unable to decompress object content")?;

        Ok(decompressed_content)
    }
}
