use crate::common::command::{repository_dir, run_twig_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn init_twice_fails(repository_dir: TempDir) {
    let dir = repository_dir;
    run_twig_command(dir.path(), &["init"]).assert().success();

    run_twig_command(dir.path(), &["init"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains(
            "A twig version-control system already exists in the current directory.",
        ));
}
