use crate::common::command::{prompt_output, repository_dir};
use crate::common::repo::TestRepo;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// A wholly-untracked directory counts once no matter how many files it
/// holds, and a directory with no files at all stays invisible.
#[rstest]
fn untracked_files_and_directories(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = TestRepo::init(repository_dir.path());

    let head = repo.commit_files(&[("tracked.txt", "t")], &[], 1_700_000_000);
    repo.set_branch("main", &head);
    repo.set_upstream("main", "origin");
    repo.set_remote_ref("origin", "main", &head);
    repo.index().stage("tracked.txt").write();

    repo.write_file("stray.txt", "loose");
    repo.write_file("newdir/inner.txt", "nested");
    repo.write_file("newdir/deeper/also.txt", "nested");
    std::fs::create_dir_all(repository_dir.path().join("empty"))?;

    assert_eq!(
        prompt_output(repository_dir.path()),
        " %F{black}git:(%fmain 2%F{blue}?%f%F{black})%f"
    );

    Ok(())
}
