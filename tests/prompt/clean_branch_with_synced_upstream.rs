use crate::common::command::{prompt_output, repository_dir};
use crate::common::repo::TestRepo;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn clean_branch_with_synced_upstream(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = TestRepo::init(repository_dir.path());

    let head = repo.commit_files(&[("1.txt", "one"), ("a/2.txt", "two")], &[], 1_700_000_000);
    repo.set_branch("main", &head);
    repo.set_upstream("main", "origin");
    repo.set_remote_ref("origin", "main", &head);
    repo.index().stage("1.txt").stage("a/2.txt").write();

    assert_eq!(
        prompt_output(repository_dir.path()),
        " %F{black}git:(%fmain%F{black})%f"
    );

    Ok(())
}
