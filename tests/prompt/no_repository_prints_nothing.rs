use crate::common::command::{repository_dir, run_prompt_command};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn no_repository_prints_nothing(
    repository_dir: TempDir,
) -> Result<(), Box<dyn std::error::Error>> {
    run_prompt_command(repository_dir.path(), &[])
        .assert()
        .success()
        .stdout("");

    Ok(())
}
