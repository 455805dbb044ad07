use crate::common::command::{prompt_output, repository_dir};
use crate::common::repo::TestRepo;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// One file deleted from the worktree only (still staged) and one file
/// deleted from the index as well: a staged deletion and an unstaged
/// deletion, rendered as separate groups.
#[rstest]
fn deleted_files_on_both_axes(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = TestRepo::init(repository_dir.path());

    let head = repo.commit_files(
        &[("kept.txt", "kept"), ("gone.txt", "bye"), ("removed.txt", "bye too")],
        &[],
        1_700_000_000,
    );
    repo.set_branch("main", &head);
    repo.set_upstream("main", "origin");
    repo.set_remote_ref("origin", "main", &head);

    // removed.txt left out of the index entirely: staged deletion
    repo.index()
        .stage("kept.txt")
        .stage_deleted("gone.txt", "bye")
        .write();

    // gone.txt staged but missing on disk: unstaged deletion
    repo.remove_file("gone.txt");
    repo.remove_file("removed.txt");

    assert_eq!(
        prompt_output(repository_dir.path()),
        " %F{black}git:(%fmain 1%F{green}D%f 1%F{red}D%f%F{black})%f"
    );

    Ok(())
}
