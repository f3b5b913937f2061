use crate::areas::database::Database;
use crate::areas::staging::StagingArea;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::repository_state::RepositoryState;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::commit::commit_writer::CommitWriter;
use crate::artifacts::merge::split_point::{SplitPointFinder, SplitPointStrategy};
use crate::artifacts::merge::three_way::{MergeAction, ThreeWayMerge};
use crate::artifacts::objects::commit::FileTree;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use bytes::Bytes;
use chrono::{DateTime, FixedOffset};
use derive_new::new;
use std::collections::BTreeSet;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The given head is already part of the current history
    GivenIsAncestor,
    /// The current branch moved to the given head without a new commit
    FastForwarded(ObjectId),
    /// A merge commit joined both heads
    Merged { commit_id: ObjectId, conflicts: bool },
}

#[derive(new)]
pub struct Merger<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    strategy: SplitPointStrategy,
    timestamp: DateTime<FixedOffset>,
}

impl Merger<'_> {
    /// Merge the branch named `given` into the current branch
    ///
    /// Every precondition is checked before the working directory, the stage
    /// or the branch heads change.
    ///
    /// # Arguments
    ///
    /// * `given` - Name of the branch to merge in
    /// * `state` - Branch heads, updated when the current branch moves
    /// * `staging` - Must be empty; left empty after a successful merge
    ///
    /// # Returns
    ///
    /// Whether the merge was a no-op, a fast-forward or a new merge commit,
    /// and in the last case whether any path conflicted
    pub fn merge(
        &self,
        given: &str,
        state: &mut RepositoryState,
        staging: &mut StagingArea,
    ) -> anyhow::Result<MergeOutcome> {
        if !staging.is_empty() {
            return Err(TwigError::UncommittedChanges.into());
        }

        let given_branch = state.find_branch(given)?;
        if &given_branch == state.current_branch() {
            return Err(TwigError::SelfMerge.into());
        }

        let current_head = state.head().clone();
        let given_head = state
            .head_of(&given_branch)
            .cloned()
            .ok_or_else(|| TwigError::NoSuchBranch(given.to_string()))?;

        let current_tree = self.database.load_commit(&current_head)?.into_tree();
        let given_tree = self.database.load_commit(&given_head)?.into_tree();

        // only paths the given head tracks can be written by the merge
        Migration::new(self.database, self.workspace, &current_tree, &given_tree)
            .plan_changes()?;

        let split_point = self.split_point(&current_head, &given_head)?;

        if split_point == given_head {
            return Ok(MergeOutcome::GivenIsAncestor);
        }

        if split_point == current_head {
            Migration::new(self.database, self.workspace, &current_tree, &given_tree)
                .apply_changes()?;
            state.set_head(given_head.clone());
            staging.clear()?;

            return Ok(MergeOutcome::FastForwarded(given_head));
        }

        let split_tree = self.database.load_commit(&split_point)?.into_tree();
        let conflicts = self.reconcile(&split_tree, &current_tree, &given_tree, staging)?;

        let message = format!("Merged {} into {}.", given_branch, state.current_branch());
        let (commit_id, _) = CommitWriter::new(self.database, self.timestamp)
            .commit_merge(&message, given_head, state, staging)?;

        Ok(MergeOutcome::Merged {
            commit_id,
            conflicts,
        })
    }

    fn split_point(
        &self,
        current_head: &ObjectId,
        given_head: &ObjectId,
    ) -> anyhow::Result<ObjectId> {
        let database = self.database;
        let finder = SplitPointFinder::new(
            |oid: &ObjectId| {
                let commit = database.load_commit(oid)?;
                Ok(commit.parents().iter().cloned().collect())
            },
            self.strategy,
        );

        finder
            .find_split_point(current_head, given_head)?
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No common ancestor between {} and {}",
                    current_head.to_short_oid(),
                    given_head.to_short_oid()
                )
            })
    }

    /// Apply the three-way rules to every path and stage the result
    ///
    /// Returns whether any path ended in a conflict.
    fn reconcile(
        &self,
        split_tree: &FileTree,
        current_tree: &FileTree,
        given_tree: &FileTree,
        staging: &mut StagingArea,
    ) -> anyhow::Result<bool> {
        let paths = split_tree
            .keys()
            .chain(current_tree.keys())
            .chain(given_tree.keys())
            .collect::<BTreeSet<_>>();

        let mut conflicts = false;
        for path in paths {
            let action = ThreeWayMerge::classify(
                split_tree.get(path),
                current_tree.get(path),
                given_tree.get(path),
            );
            tracing::debug!(path = %path.display(), ?action, "merge");

            match action {
                MergeAction::KeepCurrent => {}
                MergeAction::TakeGiven(oid) => {
                    let content = self.database.get(&oid)?;
                    self.write_and_stage(path, content, current_tree, staging)?;
                }
                MergeAction::Remove => {
                    self.workspace.remove_file(path)?;
                    staging.stage_removal(path)?;
                }
                MergeAction::Conflict { current, given } => {
                    let content = ThreeWayMerge::conflict_content(
                        &self.content_of(current.as_ref())?,
                        &self.content_of(given.as_ref())?,
                    );
                    self.write_and_stage(path, content, current_tree, staging)?;
                    conflicts = true;
                }
            }
        }

        Ok(conflicts)
    }

    fn write_and_stage(
        &self,
        path: &Path,
        content: Bytes,
        current_tree: &FileTree,
        staging: &mut StagingArea,
    ) -> anyhow::Result<()> {
        self.workspace.write_file(path, &content)?;
        staging.stage_content(path, content, current_tree)
    }

    fn content_of(&self, oid: Option<&ObjectId>) -> anyhow::Result<Bytes> {
        match oid {
            Some(oid) => self.database.get(oid),
            None => Ok(Bytes::new()),
        }
    }
}
