use crate::areas::database::Database;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::commit::FileTree;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use bytes::Bytes;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Type of file system action required for checkout
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    /// Create a file the source snapshot does not track
    Add,
    /// Delete a file the target snapshot does not track
    Delete,
    /// Rewrite a file tracked by both snapshots
    Modify,
}

pub type ActionsSet = BTreeMap<ActionType, Vec<(PathBuf, Option<ObjectId>)>>;

/// Move the working directory from one tracked snapshot to another
///
/// Every path of the target snapshot is written, so local edits to tracked
/// files are overwritten. Paths tracked by the source snapshot but absent from
/// the target are deleted. Files the source snapshot does not track are never
/// touched: if the target would overwrite one, planning fails.
pub struct Migration<'r> {
    database: &'r Database,
    workspace: &'r Workspace,
    from_tree: &'r FileTree,
    to_tree: &'r FileTree,
    actions: ActionsSet,
    untracked: BTreeSet<PathBuf>,
}

impl<'r> Migration<'r> {
    pub fn new(
        database: &'r Database,
        workspace: &'r Workspace,
        from_tree: &'r FileTree,
        to_tree: &'r FileTree,
    ) -> Self {
        let actions = BTreeMap::from([
            (ActionType::Add, Vec::new()),
            (ActionType::Delete, Vec::new()),
            (ActionType::Modify, Vec::new()),
        ]);

        Migration {
            database,
            workspace,
            from_tree,
            to_tree,
            actions,
            untracked: BTreeSet::new(),
        }
    }

    pub fn actions_of(&self, action: &ActionType) -> &[(PathBuf, Option<ObjectId>)] {
        self.actions
            .get(action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn apply_changes(&mut self) -> anyhow::Result<()> {
        self.plan_changes()?;
        self.workspace.apply_migration(self)?;

        Ok(())
    }

    /// Record the actions and fail with every conflicting path, without writing
    pub fn plan_changes(&mut self) -> anyhow::Result<()> {
        for (path, oid) in self.to_tree {
            self.check_for_conflict(path);

            let action = if self.from_tree.contains_key(path) {
                ActionType::Modify
            } else {
                ActionType::Add
            };
            self.actions
                .entry(action)
                .or_default()
                .push((path.clone(), Some(oid.clone())));
        }

        for path in self.from_tree.keys() {
            if !self.to_tree.contains_key(path) {
                self.actions
                    .entry(ActionType::Delete)
                    .or_default()
                    .push((path.clone(), None));
            }
        }

        tracing::debug!(
            add = self.actions_of(&ActionType::Add).len(),
            modify = self.actions_of(&ActionType::Modify).len(),
            delete = self.actions_of(&ActionType::Delete).len(),
            conflicts = self.untracked.len(),
            "planned checkout"
        );

        if !self.untracked.is_empty() {
            return Err(TwigError::UntrackedFileConflict {
                paths: self.untracked.iter().cloned().collect(),
            }
            .into());
        }

        Ok(())
    }

    fn check_for_conflict(&mut self, path: &Path) {
        if self.from_tree.contains_key(path) {
            return;
        }

        if self.workspace.path().join(path).exists() {
            self.untracked.insert(path.to_path_buf());
        } else if let Some(parent) = self.untracked_parent(path) {
            self.untracked.insert(parent.to_path_buf());
        }
    }

    /// An untracked regular file standing where the path needs a directory
    fn untracked_parent<'p>(&self, path: &'p Path) -> Option<&'p Path> {
        path.parent()?.ancestors().find(|parent| {
            !parent.as_os_str().is_empty()
                && self.workspace.exists(parent)
                && !self.from_tree.contains_key(*parent)
        })
    }

    pub fn load_blob_data(&self, object_id: &ObjectId) -> anyhow::Result<Bytes> {
        self.database.get(object_id)
    }
}
