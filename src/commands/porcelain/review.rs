use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkpoint::WIP_SENTINEL;
use crate::artifacts::checkpoint::checkpoint::{Checkpoint, PrTarget};
use crate::artifacts::checkpoint::error::{StepFailure, SwitchError};
use crate::artifacts::checkpoint::outcome::SwitchOutcome;
use crate::artifacts::checkpoint::transition::{CommitOutcome, SwitchPhase};
use crate::artifacts::remote::DEFAULT_REMOTE;
use colored::Colorize;

/// Progress of one review switch through its phases
struct Switch<'r> {
    repository: &'r Repository,
    origin: BranchName,
    phase: SwitchPhase,
    has_marker: bool,
}

impl<'r> Switch<'r> {
    fn new(repository: &'r Repository, origin: BranchName) -> Self {
        Switch {
            repository,
            origin,
            phase: SwitchPhase::Idle,
            has_marker: false,
        }
    }

    fn advance(&mut self) {
        if let Some(next) = self.phase.next() {
            tracing::debug!(from = ?self.phase, to = ?next, "switch transition");
            self.phase = next;
        }
    }

    /// Undo the work of the current phase and turn `failure` into the caller's error
    async fn roll_back(mut self, failure: StepFailure) -> SwitchError {
        tracing::warn!(phase = ?self.phase, error = %failure.detail(), "review switch failed");
        self.repository
            .progress(format!("{}, rolling back...", failure).red());

        let mut undone = Vec::new();
        for compensation in self.phase.compensations(&self.origin, self.has_marker) {
            if let Err(rollback) = self
                .repository
                .runner()
                .run(&compensation.git_args())
                .await
            {
                tracing::error!(%rollback, %compensation, "rollback step failed");
                self.repository.progress(
                    format!("Failed to {}, working copy needs attention", compensation.action())
                        .red()
                        .bold(),
                );

                return SwitchError::RollbackFailed {
                    failure,
                    compensation,
                    rollback,
                    undone,
                };
            }

            self.repository.progress(format!("Rolled back: {compensation}"));
            undone.push(compensation);
        }

        self.phase = SwitchPhase::RolledBack;
        tracing::debug!(phase = ?self.phase, "switch transition");
        SwitchError::RolledBack { failure, undone }
    }
}

impl Repository {
    /// Save the current work and switch to the branch under review
    ///
    /// Uncommitted changes, if any, are committed on the current branch as a
    /// marker commit whose subject is [`WIP_SENTINEL`], then the target branch is
    /// checked out and pulled. A failed step rolls back the earlier ones; a
    /// failed pull only downgrades the outcome to [`SwitchOutcome::PullFailed`].
    pub async fn switch_to_pr(&self, target: &PrTarget) -> Result<SwitchOutcome, SwitchError> {
        if !self.is_repository().await {
            return Err(SwitchError::NotARepository);
        }

        let store = self
            .checkpoints()
            .await
            .map_err(SwitchError::GitDirLookupFailed)?;
        if let Some(pending) = store.load()? {
            return Err(SwitchError::CheckpointPending {
                origin: pending.origin_branch().clone(),
                target: pending.target_branch().clone(),
            });
        }

        let origin = self
            .current_branch()
            .await
            .map_err(SwitchError::BranchLookupFailed)?
            .ok_or(SwitchError::DetachedHead)?;
        let head_ref = target.head_ref();
        if &origin == head_ref {
            return Err(SwitchError::AlreadyOnBranch(origin));
        }

        self.progress(format!("Switching to branch `{head_ref}`"));
        let mut switch = Switch::new(self, origin.clone());

        switch.advance();
        self.progress("Saving work in progress ...");
        if let Err(error) = self.runner().run(&["add", "--all"]).await {
            return Err(switch
                .roll_back(StepFailure::StagingFailed(error))
                .await);
        }

        let commit = self
            .runner()
            .run(&["commit", "--no-verify", "--no-gpg-sign", "-m", WIP_SENTINEL])
            .await;
        match CommitOutcome::classify(commit) {
            Ok(CommitOutcome::Created) => {
                switch.has_marker = true;
                self.progress(format!("Saved work in progress on `{origin}`"));
            }
            Ok(CommitOutcome::NothingToCommit) => {
                self.progress("Nothing to save, working tree clean");
            }
            Err(source) => {
                return Err(switch
                    .roll_back(StepFailure::CommitFailed {
                        branch: origin,
                        source,
                    })
                    .await);
            }
        }

        switch.advance();
        if let Err(source) = self.runner().run(&["checkout", head_ref.as_ref()]).await {
            return Err(switch
                .roll_back(StepFailure::BranchSwitchFailed {
                    branch: head_ref.clone(),
                    source,
                })
                .await);
        }

        switch.advance();
        let checkpoint = Checkpoint::new(
            origin,
            head_ref.clone(),
            switch.has_marker,
            chrono::Utc::now(),
        );
        if let Err(error) = store.save(&checkpoint) {
            return Err(switch
                .roll_back(StepFailure::CheckpointWriteFailed(error))
                .await);
        }

        let pull = self
            .runner()
            .run(&["pull", "--ff-only", DEFAULT_REMOTE, head_ref.as_ref()])
            .await;
        switch.advance();

        match pull {
            Ok(_) => {
                self.progress("Success!".green().bold());
                Ok(SwitchOutcome::UpToDate { checkpoint })
            }
            Err(warning) => {
                tracing::warn!(%warning, branch = %head_ref, "pull failed after switching");
                self.progress("Success!".green().bold());
                self.progress(
                    format!("Switched to `{head_ref}` but failed to pull latest changes: {warning}")
                        .yellow(),
                );
                Ok(SwitchOutcome::PullFailed {
                    checkpoint,
                    warning,
                })
            }
        }
    }
}
