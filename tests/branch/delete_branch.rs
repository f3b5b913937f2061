use crate::common::command::{commit_files, commit_id, init_repository_dir, run_twig_command};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn delete_branch_keeps_its_commits(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "topic/side"]).assert().success();
    run_twig_command(dir.path(), &["checkout", "topic/side"]).assert().success();
    commit_files(dir.path(), &[("side.txt", "side\n")], "Side work");
    let side_commit = commit_id(dir.path(), "Side work");
    run_twig_command(dir.path(), &["checkout", "master"]).assert().success();

    run_twig_command(dir.path(), &["rm-branch", "topic/side"])
        .assert()
        .success();

    dir.child(".twig/refs/heads/topic").assert(predicate::path::missing());
    run_twig_command(dir.path(), &["checkout", &side_commit, "--", "side.txt"])
        .assert()
        .success();
    dir.child("side.txt").assert("side\n");
}

#[rstest]
#[case::current("master", "Cannot remove the current branch.")]
#[case::missing("nope", "A branch with that name does not exist.")]
fn delete_branch_rejects(
    init_repository_dir: TempDir,
    #[case] name: &str,
    #[case] message: &'static str,
) {
    run_twig_command(init_repository_dir.path(), &["rm-branch", name])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(message));
}
