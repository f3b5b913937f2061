use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;

impl Repository {
    /// Create a branch pointing at the current head, without switching to it
    pub fn branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let (mut state, mut staging) = self.load()?;
        let branch_name = BranchName::try_parse(branch_name.to_string())?;

        let head = state.head().clone();
        state.create_branch(branch_name, head)?;

        self.save(&state, &mut staging)
    }

    /// Delete a branch pointer; its commits stay in the database
    pub fn remove_branch(&mut self, branch_name: &str) -> anyhow::Result<()> {
        let (mut state, mut staging) = self.load()?;

        let head = state.remove_branch(branch_name)?;
        tracing::debug!(branch = branch_name, %head, "removed branch");

        self.save(&state, &mut staging)
    }
}
