use crate::common::command::{
    commit_files,
    commit_id,
    init_repository_dir,
    run_twig_command,
    stdout_of,
};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn show_first_parent_history(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    commit_files(dir.path(), &[("3.txt", "three\n")], "Add 3.txt");

    let log = stdout_of(run_twig_command(dir.path(), &["log"]));

    let second = commit_id(dir.path(), "Add 3.txt");
    let first = commit_id(dir.path(), "Initial files");
    let root = commit_id(dir.path(), "initial commit");
    assert_eq!(
        log,
        format!(
            "===\ncommit {second}\nDate: Sun Jan 1 12:00:00 2023 +0000\nAdd 3.txt\n\n\
             ===\ncommit {first}\nDate: Sun Jan 1 12:00:00 2023 +0000\nInitial files\n\n\
             ===\ncommit {root}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n"
        )
    );
}
