use crate::areas::repository::Repository;
use crate::artifacts::checkpoint::checkpoint::Checkpoint;
use anyhow::{Context, bail};
use colored::Colorize;

impl Repository {
    pub async fn pending_checkpoint(&self) -> anyhow::Result<Option<Checkpoint>> {
        if !self.is_repository().await {
            bail!("not a git repository");
        }

        let store = self
            .checkpoints()
            .await
            .context("failed to locate the git directory")?;

        Ok(store.load()?)
    }

    pub async fn show_status(&self) -> anyhow::Result<()> {
        match self.pending_checkpoint().await? {
            Some(checkpoint) => {
                let started = checkpoint
                    .created_at()
                    .with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S");

                self.progress(format!(
                    "Reviewing `{}` since {started}",
                    checkpoint.target_branch().as_ref().bold()
                ));
                self.progress(format!(
                    "Started from `{}`{}",
                    checkpoint.origin_branch(),
                    if checkpoint.has_marker_commit() {
                        ", work in progress saved"
                    } else {
                        ""
                    }
                ));
            }
            None => self.progress("No review in progress"),
        }

        Ok(())
    }
}
