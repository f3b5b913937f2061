use crate::common::command::{commit_files, repository_dir, run_twig_command, stdout_of, twig_add};
use crate::common::file::{FileSpec, write_file};
use assert_fs::TempDir;
use pretty_assertions::assert_eq;
use rstest::rstest;

#[rstest]
fn print_every_section_in_name_order(repository_dir: TempDir) {
    let dir = repository_dir;
    run_twig_command(dir.path(), &["init"]).assert().success();
    commit_files(dir.path(), &[("a.txt", "a\n"), ("b.txt", "b\n")], "Two files");
    run_twig_command(dir.path(), &["branch", "other"]).assert().success();

    write_file(FileSpec::new(dir.path().join("c.txt"), "c\n".to_string()));
    write_file(FileSpec::new(dir.path().join("a.txt"), "a, edited\n".to_string()));
    run_twig_command(dir.path(), &["rm", "b.txt"]).assert().success();
    write_file(FileSpec::new(dir.path().join("e.txt"), "e\n".to_string()));
    write_file(FileSpec::new(dir.path().join("d.txt"), "d\n".to_string()));
    twig_add(dir.path(), &["e.txt", "d.txt"]);

    let status = stdout_of(run_twig_command(dir.path(), &["status"]));

    assert_eq!(
        status,
        "=== Branches ===\n*master\nother\n\n\
         === Staged Files ===\nd.txt\ne.txt\n\n\
         === Removed Files ===\nb.txt\n\n\
         === Modifications Not Staged For Commit ===\na.txt (modified)\n\n\
         === Untracked Files ===\nc.txt\n\n"
    );
}
