use crate::common::command::{head_commit_id, init_repository_dir, run_twig_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn find_commits_by_message(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    let head = head_commit_id(dir.path());

    run_twig_command(dir.path(), &["find", "Initial files"])
        .assert()
        .success()
        .stdout(predicate::str::diff(format!("{head}\n")));

    run_twig_command(dir.path(), &["find", "Initial"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Found no commit with that message."));
}
