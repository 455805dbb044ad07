use crate::common::command::{prompt_output, repository_dir};
use crate::common::repo::TestRepo;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn run_from_nested_subdirectory(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = TestRepo::init(repository_dir.path());

    let head = repo.commit_files(&[("a/b/3.txt", "three")], &[], 1_700_000_000);
    repo.set_branch("main", &head);
    repo.set_upstream("main", "origin");
    repo.set_remote_ref("origin", "main", &head);
    repo.index().stage("a/b/3.txt").write();

    let nested = repository_dir.path().join("a").join("b");
    assert_eq!(prompt_output(&nested), " %F{black}git:(%fmain%F{black})%f");

    Ok(())
}
