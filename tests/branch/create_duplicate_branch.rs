use crate::common::command::{init_repository_dir, run_twig_command};
use assert_fs::TempDir;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
#[case::existing("feature")]
#[case::current("master")]
fn create_duplicate_branch(init_repository_dir: TempDir, #[case] name: &str) {
    let dir = init_repository_dir;
    run_twig_command(dir.path(), &["branch", "feature"]).assert().success();

    run_twig_command(dir.path(), &["branch", name])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("A branch with that name already exists."));
}
