use crate::common::command::{repository_dir, run_prompt_command};
use crate::common::repo::TestRepo;
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

/// A corrupt index must abort loudly rather than render a misleading
/// partial state.
#[rstest]
fn corrupt_index_aborts(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let repo = TestRepo::init(repository_dir.path());

    let head = repo.commit_files(&[("1.txt", "one")], &[], 1_700_000_000);
    repo.set_branch("main", &head);
    repo.index().stage("1.txt").write();

    let index_path = repo.git_dir().join("index");
    let mut content = std::fs::read(&index_path)?;
    let last = content.len() - 1;
    content[last] ^= 0xFF;
    std::fs::write(&index_path, content)?;

    run_prompt_command(repository_dir.path(), &[])
        .assert()
        .failure()
        .stderr(predicate::str::contains("checksum"));

    Ok(())
}
