use crate::areas::staging::StagingArea;
use crate::areas::workspace::Workspace;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::repository_state::RepositoryState;
use crate::artifacts::objects::commit::FileTree;
use crate::artifacts::staging::stage_entry::StagedChange;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use crate::artifacts::status::inspector::Inspector;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

pub type FileSet = BTreeSet<PathBuf>;
pub type ChangeSet = BTreeMap<PathBuf, WorkspaceChangeType>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusInfo {
    pub(crate) branches: Vec<BranchName>,
    pub(crate) current_branch: BranchName,
    pub(crate) staged_files: FileSet,
    pub(crate) removed_files: FileSet,
    pub(crate) workspace_changeset: ChangeSet,
    pub(crate) untracked_files: FileSet,
}

#[derive(new)]
pub struct Status<'r> {
    workspace: &'r Workspace,
}

impl Status<'_> {
    pub fn initialize(
        &self,
        state: &RepositoryState,
        head_tree: &FileTree,
        staging: &StagingArea,
    ) -> anyhow::Result<StatusInfo> {
        let inspector = Inspector::new(self.workspace);

        let staged_files = staging
            .added()
            .chain(staging.modified())
            .cloned()
            .collect::<FileSet>();
        let removed_files = staging.removed().cloned().collect::<FileSet>();

        let mut workspace_changeset = ChangeSet::new();
        for (path, oid) in head_tree {
            if staging.change_of(path).is_some() {
                continue;
            }
            if let Some(change) = inspector.check_against(path, oid)? {
                workspace_changeset.insert(path.clone(), change);
            }
        }
        for (path, change) in staging.entries() {
            let Some(snapshot) = change.snapshot() else {
                continue;
            };
            if let Some(change) = inspector.check_against(path, snapshot)? {
                workspace_changeset.insert(path.clone(), change);
            }
        }

        // a file staged for removal and then re-created counts as untracked
        let untracked_files = self
            .workspace
            .list_files()?
            .into_iter()
            .filter(|path| match staging.change_of(path) {
                Some(StagedChange::Removed) => true,
                Some(_) => false,
                None => !head_tree.contains_key(path),
            })
            .collect::<FileSet>();

        Ok(StatusInfo {
            branches: state.branches().map(|(branch, _)| branch.clone()).collect(),
            current_branch: state.current_branch().clone(),
            staged_files,
            removed_files,
            workspace_changeset,
            untracked_files,
        })
    }
}
