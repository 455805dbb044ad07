pub mod change_record;
pub mod classifier;

pub use change_record::{ChangeRecord, ChangeStatus};
pub use classifier::{ConflictKind, RepoState};
