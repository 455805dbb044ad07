use crate::common::command::{prompt_output, repository_dir};
use crate::common::repo::TestRepo;
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// A branch that forked before the default branch moved on is both
/// ahead and behind; the two-way marker prefixes the branch name.
#[rstest]
fn branch_behind_default_shows_prefix(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    let repo = TestRepo::init(repository_dir.path());

    let base = repo.commit_files(&[("1.txt", "one")], &[], 1_700_000_000);

    // main moves on without touching the worktree
    let main_tree = repo.store_tree(&[("1.txt", "one"), ("2.txt", "two")]);
    let main_tip = repo.store_commit(&main_tree, &[&base], 1_700_000_100);
    repo.set_branch("main", &main_tip);

    let topic_tip = repo.commit_files(
        &[("1.txt", "one"), ("3.txt", "three")],
        &[&base],
        1_700_000_200,
    );
    repo.set_branch("topic", &topic_tip);
    repo.set_head_branch("topic");
    repo.set_upstream("topic", "origin");
    repo.set_remote_ref("origin", "topic", &topic_tip);
    repo.index().stage("1.txt").stage("3.txt").write();

    assert_eq!(
        prompt_output(repository_dir.path()),
        " %F{black}git:(%f%F{magenta}⇅%f1/1 topic%F{black})%f"
    );

    Ok(())
}
