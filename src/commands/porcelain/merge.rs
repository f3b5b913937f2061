use crate::areas::repository::Repository;
use crate::artifacts::merge::merger::{MergeOutcome, Merger};

impl Repository {
    pub fn merge(&mut self, given: &str) -> anyhow::Result<()> {
        let (mut state, mut staging) = self.load()?;

        let merger = Merger::new(
            self.database(),
            self.workspace(),
            self.config().merge_base(),
            self.config().commit_timestamp(),
        );
        let outcome = merger.merge(given, &mut state, &mut staging)?;

        self.save(&state, &mut staging)?;

        match outcome {
            MergeOutcome::GivenIsAncestor => {
                writeln!(
                    self.writer(),
                    "Given branch is an ancestor of the current branch."
                )?;
            }
            MergeOutcome::FastForwarded(_) => {
                writeln!(self.writer(), "Current branch fast-forwarded.")?;
            }
            MergeOutcome::Merged {
                commit_id,
                conflicts,
            } => {
                tracing::info!(oid = %commit_id, conflicts, "merged");
                if conflicts {
                    writeln!(self.writer(), "Encountered a merge conflict.")?;
                }
            }
        }

        Ok(())
    }
}
