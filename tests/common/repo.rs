//! On-disk repository fixtures
//!
//! Builds real `.git` layouts byte by byte (loose objects, refs,
//! packed-refs, config, a version-2 index) so the binary under test runs
//! against genuine repository data without shelling out to git.

use byteorder::{BigEndian, WriteBytesExt};
use flate2::Compression;
use flate2::write::ZlibEncoder;
use sha1::{Digest, Sha1};
use std::io::Write;
use std::os::unix::prelude::MetadataExt;
use std::path::{Path, PathBuf};

pub struct TestRepo {
    worktree: PathBuf,
    git_dir: PathBuf,
}

impl TestRepo {
    /// A regular repository: `.git` inside `worktree`, HEAD on `main`
    pub fn init(worktree: &Path) -> Self {
        let git_dir = worktree.join(".git");
        Self::scaffold(&git_dir);
        TestRepo {
            worktree: worktree.to_path_buf(),
            git_dir,
        }
    }

    /// A bare repository: `dir` itself carries the git-dir layout
    pub fn bare(dir: &Path) -> Self {
        Self::scaffold(dir);
        TestRepo {
            worktree: dir.to_path_buf(),
            git_dir: dir.to_path_buf(),
        }
    }

    /// A linked worktree: `.git` is a file pointing at `git_dir`
    pub fn linked(worktree: &Path, git_dir: &Path) -> Self {
        Self::scaffold(git_dir);
        std::fs::create_dir_all(worktree).expect("Failed to create worktree");
        std::fs::write(
            worktree.join(".git"),
            format!("gitdir: {}\n", git_dir.display()),
        )
        .expect("Failed to write gitdir link");
        TestRepo {
            worktree: worktree.to_path_buf(),
            git_dir: git_dir.to_path_buf(),
        }
    }

    fn scaffold(git_dir: &Path) {
        std::fs::create_dir_all(git_dir.join("objects")).expect("Failed to create objects dir");
        std::fs::create_dir_all(git_dir.join("refs").join("heads"))
            .expect("Failed to create refs dir");
        std::fs::write(git_dir.join("HEAD"), "ref: refs/heads/main\n")
            .expect("Failed to write HEAD");
    }

    pub fn worktree(&self) -> &Path {
        &self.worktree
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        let path = self.worktree.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", parent, e));
        }
        std::fs::write(&path, content)
            .unwrap_or_else(|e| panic!("Failed to write file {:?}: {}", path, e));
    }

    pub fn remove_file(&self, relative: &str) {
        std::fs::remove_file(self.worktree.join(relative)).expect("Failed to remove file");
    }

    pub fn store_blob(&self, content: &str) -> String {
        self.store_object("blob", content.as_bytes())
    }

    /// Store a tree (with nested subtrees) from `path -> content` pairs
    pub fn store_tree(&self, files: &[(&str, &str)]) -> String {
        let mut blobs = Vec::new();
        let mut subdirs = std::collections::BTreeMap::<&str, Vec<(&str, &str)>>::new();

        for (path, content) in files {
            match path.split_once('/') {
                None => blobs.push((*path, self.store_blob(content))),
                Some((dir, rest)) => subdirs.entry(dir).or_default().push((rest, content)),
            }
        }

        let mut entries = std::collections::BTreeMap::<String, (String, String)>::new();
        for (name, oid) in blobs {
            entries.insert(name.to_string(), ("100644".to_string(), oid));
        }
        for (dir, nested) in subdirs {
            let oid = self.store_tree(&nested);
            entries.insert(dir.to_string(), ("40000".to_string(), oid));
        }

        let mut body = Vec::new();
        for (name, (mode, oid)) in entries {
            body.extend_from_slice(format!("{} {}\0", mode, name).as_bytes());
            body.extend_from_slice(&hex_to_bytes(&oid));
        }

        self.store_object("tree", &body)
    }

    pub fn store_commit(&self, tree: &str, parents: &[&str], timestamp: i64) -> String {
        let mut body = format!("tree {}\n", tree);
        for parent in parents {
            body.push_str(&format!("parent {}\n", parent));
        }
        body.push_str(&format!(
            "author Test Author <test@example.com> {0} +0000\n\
             committer Test Author <test@example.com> {0} +0000\n\ncommit {0}\n",
            timestamp
        ));

        self.store_object("commit", body.as_bytes())
    }

    /// Write the worktree files, store them as a commit and return its oid
    pub fn commit_files(
        &self,
        files: &[(&str, &str)],
        parents: &[&str],
        timestamp: i64,
    ) -> String {
        for (path, content) in files {
            self.write_file(path, content);
        }
        let tree = self.store_tree(files);
        self.store_commit(&tree, parents, timestamp)
    }

    pub fn set_branch(&self, name: &str, oid: &str) {
        let path = self.git_dir.join("refs").join("heads").join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create ref dir");
        }
        std::fs::write(path, format!("{}\n", oid)).expect("Failed to write ref");
    }

    pub fn set_remote_ref(&self, remote: &str, branch: &str, oid: &str) {
        let path = self
            .git_dir
            .join("refs")
            .join("remotes")
            .join(remote)
            .join(branch);
        std::fs::create_dir_all(path.parent().unwrap()).expect("Failed to create remote ref dir");
        std::fs::write(path, format!("{}\n", oid)).expect("Failed to write remote ref");
    }

    /// Record a ref in `packed-refs` only (no loose file)
    pub fn pack_ref(&self, full_name: &str, oid: &str) {
        let path = self.git_dir.join("packed-refs");
        let mut content = if path.exists() {
            std::fs::read_to_string(&path).expect("Failed to read packed-refs")
        } else {
            "# pack-refs with: peeled fully-peeled sorted \n".to_string()
        };
        content.push_str(&format!("{} {}\n", oid, full_name));
        std::fs::write(path, content).expect("Failed to write packed-refs");
    }

    pub fn set_head_branch(&self, name: &str) {
        std::fs::write(
            self.git_dir.join("HEAD"),
            format!("ref: refs/heads/{}\n", name),
        )
        .expect("Failed to write HEAD");
    }

    pub fn set_head_detached(&self, oid: &str) {
        std::fs::write(self.git_dir.join("HEAD"), format!("{}\n", oid))
            .expect("Failed to write HEAD");
    }

    /// Configure `branch` to track `refs/heads/<branch>` on `remote`
    pub fn set_upstream(&self, branch: &str, remote: &str) {
        let path = self.git_dir.join("config");
        let mut content = if path.exists() {
            std::fs::read_to_string(&path).expect("Failed to read config")
        } else {
            String::new()
        };
        content.push_str(&format!(
            "[branch \"{0}\"]\n\tremote = {1}\n\tmerge = refs/heads/{0}\n",
            branch, remote
        ));
        std::fs::write(path, content).expect("Failed to write config");
    }

    pub fn index(&self) -> IndexWriter<'_> {
        IndexWriter {
            repo: self,
            entries: Vec::new(),
        }
    }

    fn store_object(&self, kind: &str, body: &[u8]) -> String {
        let mut object = format!("{} {}\0", kind, body.len()).into_bytes();
        object.extend_from_slice(body);

        let mut hasher = Sha1::new();
        hasher.update(&object);
        let oid = to_hex(&hasher.finalize());

        let (dir, file) = oid.split_at(2);
        let dir_path = self.git_dir.join("objects").join(dir);
        std::fs::create_dir_all(&dir_path).expect("Failed to create object dir");

        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&object).expect("Failed to compress object");
        std::fs::write(
            dir_path.join(file),
            encoder.finish().expect("Failed to finish compression"),
        )
        .expect("Failed to write object");

        oid
    }
}

struct RawEntry {
    name: String,
    oid: String,
    stage: u8,
    stat: [u32; 10],
}

/// Serializes a version-2 index file entry by entry
pub struct IndexWriter<'a> {
    repo: &'a TestRepo,
    entries: Vec<RawEntry>,
}

impl IndexWriter<'_> {
    /// Stage `path` with the content currently on disk, capturing its
    /// live stat metadata
    pub fn stage(mut self, path: &str) -> Self {
        let absolute = self.repo.worktree.join(path);
        let content =
            std::fs::read_to_string(&absolute).expect("Failed to read file to stage");
        let oid = self.repo.store_blob(&content);
        let stat = stat_fields(&absolute);

        self.entries.push(RawEntry {
            name: path.to_string(),
            oid,
            stage: 0,
            stat,
        });
        self
    }

    /// Stage `content` for `path` without any on-disk counterpart
    /// (the worktree copy has been deleted)
    pub fn stage_deleted(mut self, path: &str, content: &str) -> Self {
        let oid = self.repo.store_blob(content);
        let mut stat = [0u32; 10];
        stat[6] = 0o100644;

        self.entries.push(RawEntry {
            name: path.to_string(),
            oid,
            stage: 0,
            stat,
        });
        self
    }

    /// Record conflict stages (1 = base, 2 = ours, 3 = theirs) for `path`
    pub fn conflict(
        mut self,
        path: &str,
        base: Option<&str>,
        ours: Option<&str>,
        theirs: Option<&str>,
    ) -> Self {
        for (stage, content) in [(1u8, base), (2, ours), (3, theirs)] {
            if let Some(content) = content {
                let oid = self.repo.store_blob(content);
                let mut stat = [0u32; 10];
                stat[6] = 0o100644;
                self.entries.push(RawEntry {
                    name: path.to_string(),
                    oid,
                    stage,
                    stat,
                });
            }
        }
        self
    }

    pub fn write(mut self) {
        self.entries
            .sort_by(|a, b| a.name.cmp(&b.name).then(a.stage.cmp(&b.stage)));

        let mut body = Vec::new();
        body.extend_from_slice(b"DIRC");
        body.write_u32::<BigEndian>(2).unwrap();
        body.write_u32::<BigEndian>(self.entries.len() as u32)
            .unwrap();

        for entry in &self.entries {
            for field in entry.stat {
                body.write_u32::<BigEndian>(field).unwrap();
            }
            body.extend_from_slice(&hex_to_bytes(&entry.oid));

            let name = entry.name.as_bytes();
            let flags = ((entry.stage as u16) << 12) | (name.len().min(0xFFF) as u16);
            body.write_u16::<BigEndian>(flags).unwrap();
            body.extend_from_slice(name);

            // NUL padding to the next 8-byte boundary, at least one byte
            let total = (62 + name.len() + 8) & !7;
            body.extend(std::iter::repeat_n(0u8, total - (62 + name.len())));
        }

        let mut hasher = Sha1::new();
        hasher.update(&body);
        let checksum = hasher.finalize();
        body.extend_from_slice(&checksum);

        std::fs::write(self.repo.git_dir.join("index"), body).expect("Failed to write index");
    }
}

/// The ten stat fields in index order, as the kernel reports them
fn stat_fields(path: &Path) -> [u32; 10] {
    let stat = std::fs::metadata(path).expect("Failed to stat file");
    [
        stat.ctime() as u32,
        stat.ctime_nsec() as u32,
        stat.mtime() as u32,
        stat.mtime_nsec() as u32,
        stat.dev() as u32,
        stat.ino() as u32,
        0o100644,
        stat.uid(),
        stat.gid(),
        stat.size() as u32,
    ]
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

fn hex_to_bytes(hex: &str) -> Vec<u8> {
    (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16).expect("invalid hex"))
        .collect()
}
