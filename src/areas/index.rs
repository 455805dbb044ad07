//! Git index (staging area), read-only
//!
//! The index tracks which files are staged for the next commit, with
//! enough stat metadata to detect worktree changes without re-hashing
//! every file. The prompt parses it but never writes it.
//!
//! ## Index File Format (version 2)
//!
//! - Header: `DIRC`, version, entry count (all big-endian)
//! - Entries: sorted, 8-byte aligned, each with ten 32-bit stat fields,
//!   a 20-byte object ID and a 16-bit flag word (assume-valid bit,
//!   extended bit, 2-bit merge stage, 12-bit name length)
//! - Extensions (skipped here)
//! - Checksum: SHA-1 of everything before it
//!
//! Stage-0 entries are regular tracked files; stages 1..3 are the
//! base/ours/theirs versions of a path with merge conflicts.

use crate::artifacts::objects::object_id::ObjectId;
use anyhow::Context;
use byteorder::{BigEndian, ReadBytesExt};
use derive_new::new;
use sha1::{Digest, Sha1};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

const SIGNATURE: &[u8; 4] = b"DIRC";
const VERSION: u32 = 2;
const HEADER_SIZE: usize = 12;
const CHECKSUM_SIZE: usize = 20;

/// Fixed-size portion of an entry: ten u32 fields, oid, flag word
const ENTRY_FIXED_SIZE: usize = 62;

bitflags::bitflags! {
    /// The 16-bit entry flag word
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct EntryFlags: u16 {
        const ASSUME_VALID = 0x8000;
        const EXTENDED = 0x4000;
        const STAGE = 0x3000;
    }
}

/// Low 12 bits of the flag word carry the path length (or 0xFFF)
const NAME_LENGTH_MASK: u16 = 0x0FFF;

impl EntryFlags {
    pub fn stage(raw: u16) -> u8 {
        ((raw & EntryFlags::STAGE.bits()) >> 12) as u8
    }

    pub fn name_length(raw: u16) -> usize {
        (raw & NAME_LENGTH_MASK) as usize
    }
}

/// File metadata stored in index entries
///
/// Comparing these fields against a fresh stat is how change detection
/// avoids reading file content in the common case.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryMetadata {
    pub ctime: u32,
    pub ctime_nsec: u32,
    pub mtime: u32,
    pub mtime_nsec: u32,
    pub dev: u32,
    pub ino: u32,
    /// File mode (100644 or 100755)
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub size: u32,
}

/// A stage-0 index entry: one tracked file
#[derive(Debug, Clone, Default, new)]
pub struct IndexEntry {
    /// File path relative to the worktree root
    pub name: PathBuf,
    /// SHA-1 of the staged content
    pub oid: ObjectId,
    /// Stat metadata captured when the entry was written
    pub metadata: EntryMetadata,
}

impl IndexEntry {
    /// Cheap stat comparison: size and mode
    ///
    /// A recorded size of 0 is treated as unknown, matching anything.
    pub fn stat_match(&self, other: &EntryMetadata) -> bool {
        (self.metadata.size == 0 || self.metadata.size == other.size)
            && self.metadata.mode == other.mode
    }

    /// Timestamp comparison; when these match the content is trusted
    /// to be unchanged
    pub fn times_match(&self, other: &EntryMetadata) -> bool {
        self.metadata.ctime == other.ctime
            && self.metadata.ctime_nsec == other.ctime_nsec
            && self.metadata.mtime == other.mtime
            && self.metadata.mtime_nsec == other.mtime_nsec
    }
}

/// The staged versions of one path with merge conflicts
#[derive(Debug, Clone, Default)]
pub struct ConflictStages {
    /// Stage 1: common ancestor version
    pub base: Option<ObjectId>,
    /// Stage 2: our side
    pub ours: Option<ObjectId>,
    /// Stage 3: their side
    pub theirs: Option<ObjectId>,
}

impl ConflictStages {
    fn record(&mut self, stage: u8, oid: ObjectId) -> anyhow::Result<()> {
        match stage {
            1 => self.base = Some(oid),
            2 => self.ours = Some(oid),
            3 => self.theirs = Some(oid),
            _ => anyhow::bail!("invalid merge stage {}", stage),
        }
        Ok(())
    }

    /// Whether the staged (incoming) side of the merge changed this path
    pub fn index_side_changed(&self) -> bool {
        self.base != self.theirs
    }

    /// Whether our local side of the merge changed this path
    pub fn worktree_side_changed(&self) -> bool {
        self.base != self.ours
    }
}

/// Git index (staging area)
///
/// Read-only snapshot of the index file: stage-0 entries, conflicted
/// paths, and the directory set spanned by both.
#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (typically `.git/index`)
    path: Box<Path>,
    /// Tracked files mapped by path
    entries: BTreeMap<PathBuf, IndexEntry>,
    /// Conflicted paths with their staged versions
    conflicts: BTreeMap<PathBuf, ConflictStages>,
    /// Every directory containing a tracked or conflicted path
    tracked_dirs: BTreeSet<PathBuf>,
}

impl Default for Index {
    fn default() -> Self {
        Index {
            path: PathBuf::new().into_boxed_path(),
            entries: BTreeMap::default(),
            conflicts: BTreeMap::default(),
            tracked_dirs: BTreeSet::default(),
        }
    }
}

impl Index {
    pub fn new(path: Box<Path>) -> Self {
        Index {
            path,
            ..Default::default()
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn conflicts(&self) -> &BTreeMap<PathBuf, ConflictStages> {
        &self.conflicts
    }

    /// Check if a path is a tracked file, a conflicted file, or a
    /// directory containing either
    pub fn is_directly_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
            || self.conflicts.contains_key(path)
            || self.tracked_dirs.contains(path)
    }

    /// Load the index from disk
    ///
    /// Verifies the trailing checksum before trusting any entry. A
    /// missing or empty index file yields an empty index (valid for a
    /// fresh or unborn repository).
    ///
    /// # Locking
    ///
    /// Holds a shared lock on the index file while reading, so a
    /// concurrent `git` invocation cannot swap it mid-parse.
    pub fn rehydrate(&mut self) -> anyhow::Result<()> {
        self.entries.clear();
        self.conflicts.clear();
        self.tracked_dirs.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new().read(true).open(&self.path)?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)?;

        let mut content = Vec::new();
        lock.deref_mut().read_to_end(&mut content)?;

        if content.is_empty() {
            return Ok(());
        }

        self.parse(&content)
    }

    fn parse(&mut self, content: &[u8]) -> anyhow::Result<()> {
        anyhow::ensure!(
            content.len() >= HEADER_SIZE + CHECKSUM_SIZE,
            "index file is truncated"
        );
        Self::verify_checksum(content)?;

        let mut reader = std::io::Cursor::new(&content[..content.len() - CHECKSUM_SIZE]);

        let mut signature = [0u8; 4];
        reader.read_exact(&mut signature)?;
        anyhow::ensure!(&signature == SIGNATURE, "index file has a bad signature");

        let version = reader.read_u32::<BigEndian>()?;
        anyhow::ensure!(
            version == VERSION,
            "unsupported index version {} (only {} is supported)",
            version,
            VERSION
        );

        let entry_count = reader.read_u32::<BigEndian>()?;
        for _ in 0..entry_count {
            self.parse_entry(&mut reader)?;
        }

        // anything left before the checksum is extension data; skipped
        Ok(())
    }

    fn parse_entry(&mut self, reader: &mut std::io::Cursor<&[u8]>) -> anyhow::Result<()> {
        let metadata = EntryMetadata {
            ctime: reader.read_u32::<BigEndian>()?,
            ctime_nsec: reader.read_u32::<BigEndian>()?,
            mtime: reader.read_u32::<BigEndian>()?,
            mtime_nsec: reader.read_u32::<BigEndian>()?,
            dev: reader.read_u32::<BigEndian>()?,
            ino: reader.read_u32::<BigEndian>()?,
            mode: reader.read_u32::<BigEndian>()?,
            uid: reader.read_u32::<BigEndian>()?,
            gid: reader.read_u32::<BigEndian>()?,
            size: reader.read_u32::<BigEndian>()?,
        };

        let mut oid_bytes = [0u8; 20];
        reader.read_exact(&mut oid_bytes)?;
        let oid = ObjectId::from_bytes(&oid_bytes)?;

        let flags = reader.read_u16::<BigEndian>()?;
        anyhow::ensure!(
            !EntryFlags::from_bits_retain(flags).contains(EntryFlags::EXTENDED),
            "extended index entries are not supported in version 2"
        );
        let stage = EntryFlags::stage(flags);
        let name_length = EntryFlags::name_length(flags);

        let (name, consumed) = self.read_entry_name(reader, name_length)?;

        // each entry is NUL-padded to an 8-byte boundary, with at least
        // one NUL terminating the name
        let total = (ENTRY_FIXED_SIZE + name.len() + 8) & !7;
        let padding = total - (ENTRY_FIXED_SIZE + consumed);
        let mut pad = vec![0u8; padding];
        reader.read_exact(&mut pad)?;
        anyhow::ensure!(
            pad.iter().all(|&b| b == 0),
            "index entry for {} has non-zero padding",
            name
        );

        let path = PathBuf::from(&name);
        self.track_parent_dirs(&path);

        if stage == 0 {
            self.entries.insert(path, IndexEntry::new(PathBuf::from(name), oid, metadata));
        } else {
            self.conflicts
                .entry(path)
                .or_default()
                .record(stage, oid)
                .with_context(|| format!("conflict stages for {}", name))?;
        }

        Ok(())
    }

    /// Read an entry name, returning it with the number of bytes consumed
    /// (the saturated-length form also consumes the terminating NUL)
    fn read_entry_name(
        &self,
        reader: &mut std::io::Cursor<&[u8]>,
        name_length: usize,
    ) -> anyhow::Result<(String, usize)> {
        let (name_bytes, consumed) = if name_length < NAME_LENGTH_MASK as usize {
            let mut buffer = vec![0u8; name_length];
            reader.read_exact(&mut buffer)?;
            (buffer, name_length)
        } else {
            // overlong path: length field saturated, read to the NUL
            let mut buffer = Vec::new();
            let mut byte = [0u8; 1];
            loop {
                reader.read_exact(&mut byte)?;
                if byte[0] == 0 {
                    break;
                }
                buffer.push(byte[0]);
            }
            let consumed = buffer.len() + 1;
            (buffer, consumed)
        };

        let name =
            String::from_utf8(name_bytes).context("index entry path is not valid utf-8")?;
        Ok((name, consumed))
    }

    fn track_parent_dirs(&mut self, path: &Path) {
        let mut parent = path.parent();
        while let Some(dir) = parent {
            if dir.as_os_str().is_empty() {
                break;
            }
            self.tracked_dirs.insert(dir.to_path_buf());
            parent = dir.parent();
        }
    }

    fn verify_checksum(content: &[u8]) -> anyhow::Result<()> {
        let (body, recorded) = content.split_at(content.len() - CHECKSUM_SIZE);

        let mut hasher = Sha1::new();
        hasher.update(body);
        let computed = hasher.finalize();

        anyhow::ensure!(
            computed.as_slice() == recorded,
            "index checksum mismatch: the index file is corrupt"
        );
        Ok(())
    }
}
