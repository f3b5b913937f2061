use crate::common::command::{
    commit_files, commit_id, repository_dir, run_twig_command, stdout_of, twig_merge,
};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

/// Test merging divergent branches that touched different files
///
/// History:
///       A (base)
///      / \
///     B   C
///     |   |
///   master  other
///
/// Expected: the merge takes other's new and deleted files, keeps master's
/// edit, and reports nothing
#[rstest]
fn merge_simple_divergence(repository_dir: TempDir) {
    let dir = repository_dir;
    run_twig_command(dir.path(), &["init"]).assert().success();
    commit_files(
        dir.path(),
        &[("keep.txt", "keep\n"), ("drop.txt", "drop\n"), ("edit.txt", "edit\n")],
        "Commit A",
    );
    run_twig_command(dir.path(), &["branch", "other"]).assert().success();

    commit_files(dir.path(), &[("edit.txt", "edited on master\n")], "Commit B");

    run_twig_command(dir.path(), &["checkout", "other"]).assert().success();
    run_twig_command(dir.path(), &["rm", "drop.txt"]).assert().success();
    commit_files(dir.path(), &[("new/file.txt", "new\n")], "Commit C");
    run_twig_command(dir.path(), &["checkout", "master"]).assert().success();

    twig_merge(dir.path(), "other")
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    dir.child("keep.txt").assert("keep\n");
    dir.child("edit.txt").assert("edited on master\n");
    dir.child("new/file.txt").assert("new\n");
    dir.child("drop.txt").assert(predicate::path::missing());

    let merge_commit = commit_id(dir.path(), "Merged other into master.");
    let status = stdout_of(run_twig_command(dir.path(), &["status"]));
    assert!(status.contains("=== Staged Files ===\n\n=== Removed Files ===\n\n"));
    assert!(status.ends_with("=== Untracked Files ===\n\n"));

    run_twig_command(dir.path(), &["checkout", &merge_commit, "--", "drop.txt"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File does not exist in that commit."));
}
