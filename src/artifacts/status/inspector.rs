use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::WorkspaceChangeType;
use derive_new::new;
use std::path::Path;

#[derive(new)]
pub struct Inspector<'r> {
    workspace: &'r Workspace,
}

impl Inspector<'_> {
    /// How the working copy of `path` differs from the blob it should hold
    pub fn check_against(
        &self,
        path: &Path,
        expected: &ObjectId,
    ) -> anyhow::Result<Option<WorkspaceChangeType>> {
        let change = match self.workspace.hash_file(path)? {
            None => Some(WorkspaceChangeType::Deleted),
            Some(oid) if &oid == expected => None,
            Some(_) => Some(WorkspaceChangeType::Modified),
        };

        Ok(change)
    }
}
