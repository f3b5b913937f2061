use crate::areas::repository::Repository;
use crate::artifacts::status::status_info::{Status, StatusInfo};
use colored::Colorize;
use std::path::PathBuf;

impl Repository {
    pub fn status(&self) -> anyhow::Result<()> {
        let (state, staging) = self.load()?;
        let head_tree = self.database().load_commit(state.head())?.into_tree();

        let status = Status::new(self.workspace()).initialize(&state, &head_tree, &staging)?;
        self.print_status(&status)
    }

    fn print_status(&self, status: &StatusInfo) -> anyhow::Result<()> {
        writeln!(self.writer(), "=== Branches ===")?;
        for branch in &status.branches {
            if branch == &status.current_branch {
                writeln!(self.writer(), "{}", format!("*{branch}").green())?;
            } else {
                writeln!(self.writer(), "{branch}")?;
            }
        }
        writeln!(self.writer())?;

        self.print_section("Staged Files", status.staged_files.iter())?;
        self.print_section("Removed Files", status.removed_files.iter())?;

        writeln!(self.writer(), "=== Modifications Not Staged For Commit ===")?;
        for (path, change) in &status.workspace_changeset {
            writeln!(self.writer(), "{} {}", path.display(), change)?;
        }
        writeln!(self.writer())?;

        self.print_section("Untracked Files", status.untracked_files.iter())
    }

    fn print_section<'p>(
        &self,
        title: &str,
        paths: impl Iterator<Item = &'p PathBuf>,
    ) -> anyhow::Result<()> {
        writeln!(self.writer(), "=== {title} ===")?;
        for path in paths {
            writeln!(self.writer(), "{}", path.display())?;
        }
        writeln!(self.writer())?;

        Ok(())
    }
}
