use crate::areas::repository::Repository;
use crate::artifacts::checkout::migration::Migration;

impl Repository {
    /// Check out every file of the given commit and move the current branch to it
    pub fn reset(&mut self, commit: &str) -> anyhow::Result<()> {
        let (mut state, mut staging) = self.load()?;

        let target = self.database().resolve_commit(commit)?;
        let current_tree = self.database().load_commit(state.head())?.into_tree();
        let target_tree = self.database().load_commit(&target)?.into_tree();

        Migration::new(
            self.database(),
            self.workspace(),
            &current_tree,
            &target_tree,
        )
        .apply_changes()?;

        state.set_head(target.clone());
        staging.clear()?;
        self.save(&state, &mut staging)?;

        eprintln!("HEAD is now at {}", target.to_short_oid());

        Ok(())
    }
}
