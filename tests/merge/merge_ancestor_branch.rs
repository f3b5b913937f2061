use crate::common::command::{
    commit_files,
    head_commit_id,
    init_repository_dir,
    run_twig_command,
    twig_merge,
};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use rstest::rstest;

#[rstest]
fn merge_ancestor_branch(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "old"]).assert().success();
    commit_files(dir.path(), &[("1.txt", "one, newer\n")], "Newer");
    let head = head_commit_id(dir.path());

    twig_merge(dir.path(), "old")
        .assert()
        .success()
        .stdout("Given branch is an ancestor of the current branch.\n");

    assert_eq!(head_commit_id(dir.path()), head);
    dir.child("1.txt").assert("one, newer\n");
}
