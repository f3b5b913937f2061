use crate::areas::repository::Repository;
use crate::artifacts::objects::commit::{Commit, Parents};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use colored::Colorize;

impl Repository {
    /// First-parent history of the current head, newest first
    pub fn log(&self) -> anyhow::Result<()> {
        let (state, _) = self.load()?;

        let mut current = Some(state.head().clone());
        while let Some(commit_id) = current {
            let commit = self.database().load_commit(&commit_id)?;
            self.show_commit(&commit_id, &commit)?;

            current = commit.parent().cloned();
        }

        Ok(())
    }

    /// Every commit ever made, newest first
    pub fn global_log(&self) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut commits = self.database().list_commits()?;
        commits.sort_by(|(left_id, left), (right_id, right)| {
            right
                .timestamp()
                .cmp(&left.timestamp())
                .then_with(|| left_id.as_ref().cmp(right_id.as_ref()))
        });

        for (commit_id, commit) in &commits {
            self.show_commit(commit_id, commit)?;
        }

        Ok(())
    }

    /// Print the ID of every commit whose message is exactly `message`
    pub fn find(&self, message: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let mut matches = self
            .database()
            .list_commits()?
            .into_iter()
            .filter(|(_, commit)| commit.message() == message)
            .map(|(commit_id, _)| commit_id)
            .collect::<Vec<_>>();

        if matches.is_empty() {
            return Err(TwigError::NoCommitWithMessage(message.to_string()).into());
        }

        matches.sort();
        for commit_id in matches {
            writeln!(self.writer(), "{commit_id}")?;
        }

        Ok(())
    }

    fn show_commit(&self, commit_id: &ObjectId, commit: &Commit) -> anyhow::Result<()> {
        writeln!(self.writer(), "===")?;
        writeln!(
            self.writer(),
            "{}",
            format!("commit {}", commit_id).yellow()
        )?;
        if let Parents::Merge(first, second) = commit.parents() {
            writeln!(
                self.writer(),
                "Merge: {} {}",
                first.to_short_oid(),
                second.to_short_oid()
            )?;
        }
        writeln!(self.writer(), "Date: {}", commit.readable_timestamp())?;
        writeln!(self.writer(), "{}", commit.message())?;
        writeln!(self.writer())?;

        Ok(())
    }
}
