use crate::areas::repository::Repository;

impl Repository {
    pub fn rm(&mut self, path: &str) -> anyhow::Result<()> {
        let (state, mut staging) = self.load()?;
        let path = self.relative_path(path)?;

        let head_tree = self.database().load_commit(state.head())?.into_tree();
        staging.stage_remove(self.workspace(), &path, &head_tree)?;

        self.save(&state, &mut staging)
    }
}
