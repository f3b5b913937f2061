use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;
use crate::artifacts::objects::commit::FileTree;
use crate::errors::TwigError;
use std::path::Path;

impl Repository {
    /// Restore a file to its version in the current head
    pub fn checkout_file(&mut self, path: &str) -> anyhow::Result<()> {
        let (state, _) = self.load()?;
        let head_tree = self.database().load_commit(state.head())?.into_tree();

        self.restore_file(&head_tree, &self.relative_path(path)?)
    }

    /// Restore a file to its version in the commit whose ID starts with `commit`
    pub fn checkout_commit_file(&mut self, commit: &str, path: &str) -> anyhow::Result<()> {
        self.ensure_initialized()?;

        let commit_id = self.database().resolve_commit(commit)?;
        let tree = self.database().load_commit(&commit_id)?.into_tree();

        self.restore_file(&tree, &self.relative_path(path)?)
    }

    /// Replace the working directory with the head of `name` and switch to it
    pub fn checkout_branch(&mut self, name: &str) -> anyhow::Result<()> {
        let (mut state, mut staging) = self.load()?;

        let branch = state.find_branch(name)?;
        if &branch == state.current_branch() {
            return Err(TwigError::AlreadyOnBranch.into());
        }
        let target = state
            .head_of(&branch)
            .cloned()
            .ok_or_else(|| TwigError::NoSuchBranch(name.to_string()))?;

        let current_tree = self.database().load_commit(state.head())?.into_tree();
        let target_tree = self.database().load_commit(&target)?.into_tree();
        Migration::new(
            self.database(),
            self.workspace(),
            &current_tree,
            &target_tree,
        )
        .apply_changes()?;

        state.switch_to(branch)?;
        staging.clear()?;
        self.save(&state, &mut staging)?;

        eprintln!("Switched to branch '{}'", state.current_branch());

        Ok(())
    }

    fn restore_file(&self, tree: &FileTree, path: &Path) -> anyhow::Result<()> {
        let oid = tree
            .get(path)
            .ok_or_else(|| TwigError::FileNotInCommit(path.to_path_buf()))?;

        let content = self.database().get(oid)?;
        self.workspace().write_file(path, &content)?;
        tracing::debug!(path = %path.display(), %oid, "restored file");

        Ok(())
    }
}
