use crate::common::command::{commit_files, init_repository_dir, run_twig_command, stdout_of};
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn global_log_lists_every_branch(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "side"]).assert().success();
    commit_files(dir.path(), &[("3.txt", "three\n")], "On master");
    run_twig_command(dir.path(), &["checkout", "side"]).assert().success();
    commit_files(dir.path(), &[("4.txt", "four\n")], "On side");

    let log = stdout_of(run_twig_command(dir.path(), &["log"]));
    let global_log = stdout_of(run_twig_command(dir.path(), &["global-log"]));

    assert!(!log.contains("On master"));
    assert_eq!(global_log.matches("===\n").count(), 4);
    for message in ["On master", "On side", "Initial files", "initial commit"] {
        assert!(global_log.contains(&format!("{message}\n\n")), "missing {message}");
    }
    assert!(global_log.ends_with("initial commit\n\n"));
}
