use crate::common::command::{
    commit_files, commit_id, head_commit_id, repository_dir, run_twig_command, stdout_of,
    twig_merge,
};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

/// Test merging branches that changed the same file differently
///
/// History:
///       A (base)
///      / \
///     B   C
///     |   |
///   master  other
///
/// Expected: f.txt holds both versions between conflict markers, the merge
/// commit is still created
#[rstest]
fn merge_with_conflict(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;
    run_twig_command(dir.path(), &["init"]).assert().success();
    commit_files(dir.path(), &[("f.txt", "base\n"), ("g.txt", "g\n")], "Commit A");
    run_twig_command(dir.path(), &["branch", "other"]).assert().success();

    commit_files(dir.path(), &[("f.txt", "master\n")], "Commit B");
    run_twig_command(dir.path(), &["checkout", "other"]).assert().success();
    commit_files(dir.path(), &[("f.txt", "other\n")], "Commit C");
    run_twig_command(dir.path(), &["checkout", "master"]).assert().success();

    twig_merge(dir.path(), "other")
        .assert()
        .success()
        .stdout("Encountered a merge conflict.\n");

    dir.child("f.txt")
        .assert("<<<<<<< HEAD\nmaster\n=======\nother\n>>>>>>>\n");
    dir.child("g.txt").assert("g\n");

    let merge_commit = head_commit_id(dir.path());
    assert_eq!(commit_id(dir.path(), "Merged other into master."), merge_commit);

    let master = commit_id(dir.path(), "Commit B");
    let other = commit_id(dir.path(), "Commit C");
    let log = stdout_of(run_twig_command(dir.path(), &["log"]));
    assert!(log.starts_with(&format!(
        "===\ncommit {merge_commit}\nMerge: {} {}\nDate: Sun Jan 1 12:00:00 2023 +0000\nMerged other into master.\n\n",
        &master[..7],
        &other[..7]
    )));
    // log follows first parents only
    assert!(log.contains("Commit B"));
    assert!(!log.contains("Commit C"));

    let status = stdout_of(run_twig_command(dir.path(), &["status"]));
    assert!(status.contains("=== Staged Files ===\n\n"));
    assert!(status.contains("=== Modifications Not Staged For Commit ===\n\n"));

    run_twig_command(dir.path(), &["checkout", &merge_commit, "--", "g.txt"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());

    Ok(())
}
