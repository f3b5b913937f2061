use crate::common::command::{commit_files, head_commit_id, init_repository_dir, run_twig_command};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn checkout_with_untracked_conflicts(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "side"]).assert().success();
    run_twig_command(dir.path(), &["checkout", "side"]).assert().success();
    commit_files(dir.path(), &[("new.txt", "tracked on side\n")], "Side file");
    run_twig_command(dir.path(), &["checkout", "master"]).assert().success();
    let head = head_commit_id(dir.path());

    write_file(FileSpec::new(dir.path().join("new.txt"), "mine\n".to_string()));
    write_file(FileSpec::new(dir.path().join("1.txt"), "local edit\n".to_string()));

    run_twig_command(dir.path(), &["checkout", "side"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(
            "There is an untracked file in the way; delete it, or add and commit it first.",
        ))
        .stderr(predicate::str::contains("new.txt"));

    dir.child("new.txt").assert("mine\n");
    dir.child("1.txt").assert("local edit\n");
    dir.child(".twig/HEAD").assert("ref: refs/heads/master");
    assert_eq!(head_commit_id(dir.path()), head);
}
