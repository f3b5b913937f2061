use crate::common::command::{
    commit_files, commit_id, head_commit_id, repository_dir, run_twig_command, twig_merge,
};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

/// Test merging after a criss-cross merge
///
/// History:
///       A (base)
///      / \
///     B   C
///     |\ /|
///     | X |
///     |/ \|
///     D   E
///     |   |
///   master  side
///
/// Both B and C are common ancestors of D and E. Either strategy picks a
/// split point under which both heads already agree, so the merge commit
/// changes no file.
#[rstest]
#[case::first_found("first-found")]
#[case::best_common_ancestor("best")]
fn merge_criss_cross(repository_dir: TempDir, #[case] strategy: &str) {
    let dir = repository_dir;
    run_twig_command(dir.path(), &["init"]).assert().success();
    commit_files(dir.path(), &[("m.txt", "base\n"), ("s.txt", "base\n")], "Commit A");
    run_twig_command(dir.path(), &["branch", "side"]).assert().success();

    commit_files(dir.path(), &[("m.txt", "master\n")], "Commit B");
    run_twig_command(dir.path(), &["branch", "b"]).assert().success();

    run_twig_command(dir.path(), &["checkout", "side"]).assert().success();
    commit_files(dir.path(), &[("s.txt", "side\n")], "Commit C");
    run_twig_command(dir.path(), &["branch", "c"]).assert().success();
    twig_merge(dir.path(), "b").assert().success();

    run_twig_command(dir.path(), &["checkout", "master"]).assert().success();
    twig_merge(dir.path(), "c").assert().success();
    let master_head = head_commit_id(dir.path());

    twig_merge(dir.path(), "side")
        .env("TWIG_MERGE_BASE", strategy)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());

    let merge_commit = commit_id(dir.path(), "Merged side into master.");
    assert_ne!(merge_commit, master_head);
    dir.child("m.txt").assert("master\n");
    dir.child("s.txt").assert("side\n");
}
