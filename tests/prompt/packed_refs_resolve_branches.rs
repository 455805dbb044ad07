use crate::common::command::{prompt_output, repository_dir};
use crate::common::repo::TestRepo;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Refs that git has packed away have no loose file; they must still
/// resolve for both HEAD and the default branch.
#[rstest]
fn packed_refs_resolve_branches(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = TestRepo::init(repository_dir.path());

    let base = repo.commit_files(&[("1.txt", "one")], &[], 1_700_000_000);
    let tip = repo.commit_files(
        &[("1.txt", "one"), ("2.txt", "two")],
        &[&base],
        1_700_000_100,
    );

    repo.pack_ref("refs/heads/main", &base);
    repo.pack_ref("refs/heads/topic", &tip);
    repo.set_head_branch("topic");
    repo.index().stage("1.txt").stage("2.txt").write();

    // topic is ahead of the packed main only: no divergence prefix
    assert_eq!(
        prompt_output(repository_dir.path()),
        " %F{black}git:(%ftopic %F{magenta}⚡%f%F{black})%f"
    );

    Ok(())
}
