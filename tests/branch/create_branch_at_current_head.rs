use crate::common::command::{head_commit_id, init_repository_dir, run_twig_command};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
#[case::flat("feature")]
#[case::hierarchical("topic/merge-work")]
fn create_branch_at_current_head(init_repository_dir: TempDir, #[case] name: &str) {
    let dir = init_repository_dir;
    let head = head_commit_id(dir.path());

    run_twig_command(dir.path(), &["branch", name])
        .assert()
        .success();

    dir.child(format!(".twig/refs/heads/{name}"))
        .assert(predicate::str::diff(head));
    dir.child(".twig/HEAD").assert("ref: refs/heads/master");
}

#[rstest]
#[case::double_dot("bad..name")]
#[case::trailing_lock("topic.lock")]
fn create_branch_with_invalid_name(init_repository_dir: TempDir, #[case] name: &str) {
    run_twig_command(init_repository_dir.path(), &["branch", name])
        .assert()
        .code(2);

    init_repository_dir
        .child(format!(".twig/refs/heads/{name}"))
        .assert(predicate::path::missing());
}
