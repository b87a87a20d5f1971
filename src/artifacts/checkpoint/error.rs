use crate::areas::checkpoints::StoreError;
use crate::areas::runner::CommandError;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkpoint::transition::{Compensation, describe_compensations};

/// The step of a review switch that failed
#[derive(Debug, thiserror::Error)]
pub enum StepFailure {
    #[error("failed to stage changes")]
    StagingFailed(#[source] CommandError),
    #[error("failed to save work in progress on `{branch}`")]
    CommitFailed {
        branch: BranchName,
        #[source]
        source: CommandError,
    },
    #[error("failed to switch to branch `{branch}`")]
    BranchSwitchFailed {
        branch: BranchName,
        #[source]
        source: CommandError,
    },
    #[error("failed to record the review checkpoint")]
    CheckpointWriteFailed(#[source] StoreError),
}

impl StepFailure {
    /// This failure followed by its underlying cause on one line
    pub fn detail(&self) -> String {
        match std::error::Error::source(self) {
            Some(cause) => format!("{self}: {cause}"),
            None => self.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SwitchError {
    #[error("not inside a git working copy")]
    NotARepository,
    #[error(
        "a review of `{target}` started from `{origin}` is still pending, run `castor back` first"
    )]
    CheckpointPending {
        origin: BranchName,
        target: BranchName,
    },
    #[error("HEAD is detached, check out a branch before starting a review")]
    DetachedHead,
    #[error("could not determine the current branch")]
    BranchLookupFailed(#[source] CommandError),
    #[error("already on branch `{0}`")]
    AlreadyOnBranch(BranchName),
    #[error("could not locate the git directory")]
    GitDirLookupFailed(#[source] CommandError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("review aborted and rolled back ({})", describe_compensations(.undone))]
    RolledBack {
        #[source]
        failure: StepFailure,
        undone: Vec<Compensation>,
    },
    #[error(
        "{}; rolling back then failed to {}, so the working copy may be left in an \
         intermediate state and should be inspected before continuing (completed so far: {})",
        .failure.detail(),
        .compensation.action(),
        describe_compensations(.undone)
    )]
    RollbackFailed {
        failure: StepFailure,
        compensation: Compensation,
        #[source]
        rollback: CommandError,
        undone: Vec<Compensation>,
    },
}

impl SwitchError {
    /// The failed step, for errors raised after the switch started mutating
    pub fn step_failure(&self) -> Option<&StepFailure> {
        match self {
            SwitchError::RolledBack { failure, .. } | SwitchError::RollbackFailed { failure, .. } => {
                Some(failure)
            }
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RestoreError {
    #[error("not inside a git working copy")]
    NotARepository,
    #[error("no pending review to go back from")]
    NoPendingCheckpoint,
    #[error("could not locate the git directory")]
    GitDirLookupFailed(#[source] CommandError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("failed to switch back to branch `{branch}`")]
    BranchSwitchFailed {
        branch: BranchName,
        #[source]
        source: CommandError,
    },
    #[error("could not read the last commit on `{branch}`")]
    LastCommitLookupFailed {
        branch: BranchName,
        #[source]
        source: CommandError,
    },
    #[error("back on `{branch}` but failed to restore the work in progress")]
    UndoMarkerFailed {
        branch: BranchName,
        #[source]
        source: CommandError,
    },
}
