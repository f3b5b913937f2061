use crate::common::command::{init_repository_dir, run_twig_command, stdout_of, twig_commit};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn remove_unchanged_tracked_file_deletes_it(init_repository_dir: TempDir) {
    let dir = init_repository_dir;

    run_twig_command(dir.path(), &["rm", "a/2.txt"])
        .assert()
        .success();

    dir.child("a/2.txt").assert(predicate::path::missing());
    let status = stdout_of(run_twig_command(dir.path(), &["status"]));
    assert!(status.contains("=== Removed Files ===\na/2.txt\n\n"));

    twig_commit(dir.path(), "Remove 2.txt").assert().success();
    run_twig_command(dir.path(), &["checkout", "--", "a/2.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File does not exist in that commit."));
}

#[rstest]
fn remove_edited_tracked_file_keeps_the_edit(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("1.txt"), "edited\n".to_string()));

    run_twig_command(dir.path(), &["rm", "1.txt"])
        .assert()
        .success();

    dir.child("1.txt").assert("edited\n");
    let status = stdout_of(run_twig_command(dir.path(), &["status"]));
    assert!(status.contains("=== Removed Files ===\n1.txt\n\n"));
    assert!(status.ends_with("=== Untracked Files ===\n1.txt\n\n"));
}
