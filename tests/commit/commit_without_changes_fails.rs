use crate::common::command::{head_commit_id, init_repository_dir, twig_commit};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn commit_without_changes_fails(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    let head = head_commit_id(dir.path());

    twig_commit(dir.path(), "Nothing")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("No changes added to the commit."));

    assert_eq!(head_commit_id(dir.path()), head);
}
