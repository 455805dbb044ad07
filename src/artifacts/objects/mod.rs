pub mod commit;
pub mod object_id;
pub mod tree;

/// Length of a hex-encoded SHA-1 object ID
pub const OBJECT_ID_LENGTH: usize = 40;

/// Kinds of objects stored in the object database
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectType {
    Blob,
    Tree,
    Commit,
}

impl ObjectType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectType::Blob => "blob",
            ObjectType::Tree => "tree",
            ObjectType::Commit => "commit",
        }
    }

    pub fn try_parse(value: &str) -> anyhow::Result<Self> {
        match value {
            "blob" => Ok(ObjectType::Blob),
            "tree" => Ok(ObjectType::Tree),
            "commit" => Ok(ObjectType::Commit),
            _ => anyhow::bail!("unknown object type {}", value),
        }
    }
}
