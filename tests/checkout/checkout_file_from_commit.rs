use crate::common::command::{
    commit_files, commit_id, init_repository_dir, repository_dir, run_twig_command,
};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn checkout_file_right_after_init(repository_dir: TempDir) {
    let dir = repository_dir;
    run_twig_command(dir.path(), &["init"]).assert().success();

    run_twig_command(dir.path(), &["checkout", "--", "1.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File does not exist in that commit."));
}

#[rstest]
fn checkout_file_from_head(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    write_file(FileSpec::new(dir.path().join("a/2.txt"), "scratch\n".to_string()));

    run_twig_command(dir.path(), &["checkout", "--", "a/2.txt"])
        .assert()
        .success();

    dir.child("a/2.txt").assert("two\n");
}

#[rstest]
fn checkout_file_from_abbreviated_commit(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    let first = commit_id(dir.path(), "Initial files");
    commit_files(dir.path(), &[("1.txt", "one, again\n")], "Edit 1.txt");

    run_twig_command(dir.path(), &["checkout", &first[..8], "--", "1.txt"])
        .assert()
        .success();

    dir.child("1.txt").assert("one\n");
}

#[rstest]
#[case::unknown_commit("0000000", "1.txt", "No commit with that id exists.")]
#[case::untracked_file("", "missing.txt", "File does not exist in that commit.")]
fn checkout_file_rejects(
    init_repository_dir: TempDir,
    #[case] commit: &str,
    #[case] path: &str,
    #[case] message: &'static str,
) {
    let dir = init_repository_dir;
    let head = commit_id(dir.path(), "Initial files");
    let commit = if commit.is_empty() { head.as_str() } else { commit };

    run_twig_command(dir.path(), &["checkout", commit, "--", path])
        .assert()
        .code(1)
        .stderr(predicate::str::contains(message));
}
