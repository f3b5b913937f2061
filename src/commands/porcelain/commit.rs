use crate::areas::repository::Repository;
use crate::artifacts::commit::commit_writer::CommitWriter;

impl Repository {
    pub fn commit(&mut self, message: &str) -> anyhow::Result<()> {
        let (mut state, mut staging) = self.load()?;

        let timestamp = self.config().commit_timestamp();
        let (commit_id, _) = CommitWriter::new(self.database(), timestamp).commit_staged(
            message,
            &mut state,
            &mut staging,
        )?;
        tracing::info!(oid = %commit_id, branch = %state.current_branch(), "committed");

        self.save(&state, &mut staging)
    }
}
