use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::TwigError;
use std::collections::BTreeMap;

/// Branch heads and the branch currently checked out
///
/// The current branch is always one of the known branches: the constructor
/// seeds it and no method can remove it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    branches: BTreeMap<BranchName, ObjectId>,
    current_branch: BranchName,
}

impl RepositoryState {
    pub fn new(current_branch: BranchName, head: ObjectId) -> Self {
        RepositoryState {
            branches: BTreeMap::from([(current_branch.clone(), head)]),
            current_branch,
        }
    }

    pub(crate) fn from_parts(
        branches: BTreeMap<BranchName, ObjectId>,
        current_branch: BranchName,
    ) -> anyhow::Result<Self> {
        if !branches.contains_key(&current_branch) {
            anyhow::bail!("HEAD points to missing branch {current_branch}");
        }

        Ok(RepositoryState {
            branches,
            current_branch,
        })
    }

    pub fn current_branch(&self) -> &BranchName {
        &self.current_branch
    }

    pub fn head(&self) -> &ObjectId {
        // current_branch is a key of branches for every constructed state
        &self.branches[&self.current_branch]
    }

    pub fn head_of(&self, branch: &BranchName) -> Option<&ObjectId> {
        self.branches.get(branch)
    }

    pub fn branches(&self) -> impl Iterator<Item = (&BranchName, &ObjectId)> {
        self.branches.iter()
    }

    /// Look up an existing branch by its user-facing name
    pub fn find_branch(&self, name: &str) -> anyhow::Result<BranchName> {
        self.branches
            .keys()
            .find(|branch| branch.as_ref() == name)
            .cloned()
            .ok_or_else(|| TwigError::NoSuchBranch(name.to_string()).into())
    }

    /// Move the current branch to a new commit
    pub fn set_head(&mut self, oid: ObjectId) {
        self.branches.insert(self.current_branch.clone(), oid);
    }

    pub fn create_branch(&mut self, name: BranchName, oid: ObjectId) -> anyhow::Result<()> {
        if self.branches.contains_key(&name) {
            return Err(TwigError::BranchExists(name.to_string()).into());
        }

        self.branches.insert(name, oid);
        Ok(())
    }

    pub fn remove_branch(&mut self, name: &str) -> anyhow::Result<ObjectId> {
        let branch = self.find_branch(name)?;
        if branch == self.current_branch {
            return Err(TwigError::RemoveCurrentBranch.into());
        }

        self.branches
            .remove(&branch)
            .ok_or_else(|| TwigError::NoSuchBranch(name.to_string()).into())
    }

    pub fn switch_to(&mut self, branch: BranchName) -> anyhow::Result<()> {
        if !self.branches.contains_key(&branch) {
            return Err(TwigError::NoSuchBranch(branch.to_string()).into());
        }

        self.current_branch = branch;
        Ok(())
    }
}
