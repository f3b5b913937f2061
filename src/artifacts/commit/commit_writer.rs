use crate::areas::database::Database;
use crate::areas::staging::StagingArea;
use crate::artifacts::branch::repository_state::RepositoryState;
use crate::artifacts::objects::commit::{Commit, FileTree, Parents};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use chrono::{DateTime, FixedOffset};
use derive_new::new;

/// Records the staged changes as a new commit on the current branch
///
/// On success the current branch points to the new commit and the stage is
/// empty. On failure nothing is written.
#[derive(new)]
pub struct CommitWriter<'r> {
    database: &'r Database,
    timestamp: DateTime<FixedOffset>,
}

impl CommitWriter<'_> {
    /// Record the stage as a child of the current head
    ///
    /// # Returns
    ///
    /// The new commit and its ID. Fails with `EmptyMessage` or `EmptyStage`
    /// before anything is written.
    pub fn commit_staged(
        &self,
        message: &str,
        state: &mut RepositoryState,
        staging: &mut StagingArea,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        Self::check_message(message)?;

        let parent = state.head().clone();
        let head_tree = self.database.load_commit(&parent)?.into_tree();
        let tree = staging.build_tree(self.database, &head_tree)?;

        self.write(message, Parents::Single(parent), tree, state, staging)
    }

    /// Join the given head into the current branch
    ///
    /// Unlike a regular commit, an empty stage is accepted: the merge itself
    /// is recorded even when it changes no file.
    pub fn commit_merge(
        &self,
        message: &str,
        given_head: ObjectId,
        state: &mut RepositoryState,
        staging: &mut StagingArea,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        Self::check_message(message)?;

        let parent = state.head().clone();
        let head_tree = self.database.load_commit(&parent)?.into_tree();
        let tree = if staging.is_empty() {
            head_tree
        } else {
            staging.build_tree(self.database, &head_tree)?
        };

        self.write(
            message,
            Parents::Merge(parent, given_head),
            tree,
            state,
            staging,
        )
    }

    fn check_message(message: &str) -> anyhow::Result<()> {
        if message.trim().is_empty() {
            return Err(TwigError::EmptyMessage.into());
        }

        Ok(())
    }

    fn write(
        &self,
        message: &str,
        parents: Parents,
        tree: FileTree,
        state: &mut RepositoryState,
        staging: &mut StagingArea,
    ) -> anyhow::Result<(ObjectId, Commit)> {
        let commit = Commit::new(message.to_string(), self.timestamp, parents, tree);
        let commit_id = self.database.store(&commit)?;
        tracing::debug!(oid = %commit_id, merge = commit.parents().is_merge(), "wrote commit");

        state.set_head(commit_id.clone());
        staging.clear()?;

        Ok((commit_id, commit))
    }
}
