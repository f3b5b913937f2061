use crate::common::command::{repository_dir, run_twig_command, stdout_of};
use assert_fs::TempDir;
use assert_fs::prelude::*;
use predicates::prelude::predicate;
use rstest::rstest;

#[rstest]
fn init_repository_successfully(repository_dir: TempDir) -> Result<(), Box<dyn std::error::Error>> {
    let dir = repository_dir;

    run_twig_command(dir.path(), &["init"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Initialized empty twig repository in"));

    dir.child(".twig/objects").assert(predicate::path::is_dir());
    dir.child(".twig/staging").assert(predicate::path::is_dir());
    dir.child(".twig/HEAD").assert("ref: refs/heads/master");
    dir.child(".twig/refs/heads/master")
        .assert(predicate::str::is_match(r"^[0-9a-f]{40}$")?);

    let log = stdout_of(run_twig_command(dir.path(), &["log"]));
    let master = std::fs::read_to_string(dir.path().join(".twig/refs/heads/master"))?;
    assert_eq!(
        log,
        format!("===\ncommit {master}\nDate: Thu Jan 1 00:00:00 1970 +0000\ninitial commit\n\n")
    );

    Ok(())
}
