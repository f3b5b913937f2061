use crate::common::command::{init_repository_dir, run_twig_command, stdout_of, twig_add};
use crate::common::file::write_generated_files;
use assert_fs::TempDir;
use rstest::rstest;

#[rstest]
fn add_generated_files_stages_them(init_repository_dir: TempDir) {
    let dir = init_repository_dir;
    let files = write_generated_files(dir.path(), 6);

    let mut names = files
        .iter()
        .filter_map(|file| file.path.file_name())
        .map(|name| name.to_string_lossy().into_owned())
        .collect::<Vec<_>>();
    names.sort();

    let args = names.iter().map(String::as_str).collect::<Vec<_>>();
    twig_add(dir.path(), &args);

    let status = stdout_of(run_twig_command(dir.path(), &["status"]));
    let staged = format!("=== Staged Files ===\n{}\n\n", names.join("\n"));
    assert!(status.contains(&staged), "unexpected status:\n{status}");
    assert!(status.contains("=== Untracked Files ===\n\n"));
}
