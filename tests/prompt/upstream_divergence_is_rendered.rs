use crate::common::command::{prompt_output, repository_dir};
use crate::common::repo::TestRepo;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn unpushed_commits_show_the_ahead_count(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = TestRepo::init(repository_dir.path());

    let pushed = repo.commit_files(&[("1.txt", "one")], &[], 1_700_000_000);
    let local = repo.commit_files(
        &[("1.txt", "one"), ("2.txt", "two")],
        &[&pushed],
        1_700_000_100,
    );
    repo.set_branch("main", &local);
    repo.set_upstream("main", "origin");
    repo.set_remote_ref("origin", "main", &pushed);
    repo.index().stage("1.txt").stage("2.txt").write();

    assert_eq!(
        prompt_output(repository_dir.path()),
        " %F{black}git:(%fmain %F{magenta}↑%f1%F{black})%f"
    );

    Ok(())
}

#[rstest]
fn unfetched_upstream_commits_show_the_behind_count(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = TestRepo::init(repository_dir.path());

    let local = repo.commit_files(&[("1.txt", "one")], &[], 1_700_000_000);
    let remote_tree = repo.store_tree(&[("1.txt", "one"), ("2.txt", "two")]);
    let remote_tip = repo.store_commit(&remote_tree, &[&local], 1_700_000_100);

    repo.set_branch("main", &local);
    repo.set_upstream("main", "origin");
    repo.set_remote_ref("origin", "main", &remote_tip);
    repo.index().stage("1.txt").write();

    assert_eq!(
        prompt_output(repository_dir.path()),
        " %F{black}git:(%fmain 1%F{magenta}↓%f%F{black})%f"
    );

    Ok(())
}
