use crate::DEFAULT_BRANCH;
use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::branch::repository_state::RepositoryState;
use crate::artifacts::objects::commit::Commit;
use crate::errors::TwigError;
use anyhow::Context;
use std::fs;

impl Repository {
    pub fn init(&mut self) -> anyhow::Result<()> {
        if self.is_initialized() {
            return Err(TwigError::AlreadyInitialized.into());
        }

        fs::create_dir_all(self.database().objects_path())
            .context("Failed to create .twig/objects directory")?;

        fs::create_dir_all(self.refs().heads_path())
            .context("Failed to create .twig/refs/heads directory")?;

        let mut staging = self.staging();
        fs::create_dir_all(staging.snapshots_path())
            .context("Failed to create .twig/staging directory")?;

        let initial_commit = self
            .database()
            .store(&Commit::initial())
            .context("Failed to write the initial commit")?;
        let state = RepositoryState::new(
            BranchName::try_parse(DEFAULT_BRANCH.to_string())?,
            initial_commit,
        );
        self.save(&state, &mut staging)?;

        writeln!(
            self.writer(),
            "Initialized empty twig repository in {}",
            self.metadata_path().display()
        )?;

        Ok(())
    }
}
