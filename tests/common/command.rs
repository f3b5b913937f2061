use crate::common::file::{FileSpec, write_file};
use assert_cmd::Command;
use assert_fs::TempDir;
use rstest::fixture;
use std::path::Path;

pub const COMMIT_DATE: &str = "2023-01-01 12:00:00 +0000";

#[fixture]
pub fn repository_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}

/// An initialized repository whose master branch tracks `1.txt` and `a/2.txt`
#[fixture]
pub fn init_repository_dir(repository_dir: TempDir) -> TempDir {
    run_twig_command(repository_dir.path(), &["init"])
        .assert()
        .success();

    write_file(FileSpec::new(
        repository_dir.path().join("1.txt"),
        "one\n".to_string(),
    ));
    write_file(FileSpec::new(
        repository_dir.path().join("a").join("2.txt"),
        "two\n".to_string(),
    ));
    twig_add(repository_dir.path(), &["1.txt", "a/2.txt"]);

    twig_commit(repository_dir.path(), "Initial files")
        .assert()
        .success();

    repository_dir
}

pub fn run_twig_command(dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("twig").expect("Failed to find twig binary");
    cmd.envs(vec![("NO_PAGER", "1"), ("NO_COLOR", "1")]);
    cmd.env_remove("TWIG_MERGE_BASE");
    cmd.env_remove("TWIG_COMMIT_DATE");
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn twig_commit(dir: &Path, message: &str) -> Command {
    let mut cmd = run_twig_command(dir, &["commit", message]);
    cmd.env("TWIG_COMMIT_DATE", COMMIT_DATE); // %Y-%m-%d %H:%M:%S %z
    cmd
}

pub fn twig_merge(dir: &Path, branch: &str) -> Command {
    let mut cmd = run_twig_command(dir, &["merge", branch]);
    cmd.env("TWIG_COMMIT_DATE", COMMIT_DATE);
    cmd
}

/// Stage each path, asserting success
pub fn twig_add(dir: &Path, paths: &[&str]) {
    for path in paths {
        run_twig_command(dir, &["add", path]).assert().success();
    }
}

/// Write, stage and commit files in one go
pub fn commit_files(dir: &Path, files: &[(&str, &str)], message: &str) {
    for (path, content) in files {
        write_file(FileSpec::new(dir.join(path), content.to_string()));
    }
    twig_add(dir, &files.iter().map(|(path, _)| *path).collect::<Vec<_>>());
    twig_commit(dir, message).assert().success();
}

/// The ID of the single commit carrying `message`
pub fn commit_id(dir: &Path, message: &str) -> String {
    let output = run_twig_command(dir, &["find", message])
        .output()
        .expect("Failed to run find");
    let stdout = String::from_utf8(output.stdout).expect("find output is not UTF-8");

    let ids = stdout.lines().collect::<Vec<_>>();
    assert_eq!(ids.len(), 1, "expected exactly one commit named {message:?}");
    ids[0].to_string()
}

/// Get the current head commit ID from the refs on disk
pub fn head_commit_id(dir: &Path) -> String {
    let head = std::fs::read_to_string(dir.join(".twig").join("HEAD")).expect("missing HEAD");
    let ref_path = head
        .trim()
        .strip_prefix("ref: ")
        .expect("HEAD is not a symbolic reference");

    std::fs::read_to_string(dir.join(".twig").join(ref_path))
        .expect("missing branch ref")
        .trim()
        .to_string()
}

pub fn stdout_of(mut cmd: Command) -> String {
    let output = cmd.output().expect("Failed to run twig");
    assert!(output.status.success(), "twig failed: {:?}", output);
    String::from_utf8(output.stdout).expect("twig output is not UTF-8")
}
