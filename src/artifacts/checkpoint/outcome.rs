use crate::areas::runner::CommandError;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkpoint::checkpoint::Checkpoint;

/// How a successful review switch ended
#[derive(Debug)]
pub enum SwitchOutcome {
    /// On the target branch and up to date with `origin`
    UpToDate { checkpoint: Checkpoint },
    /// On the target branch, but pulling from `origin` failed
    PullFailed {
        checkpoint: Checkpoint,
        warning: CommandError,
    },
}

impl SwitchOutcome {
    pub fn checkpoint(&self) -> &Checkpoint {
        match self {
            SwitchOutcome::UpToDate { checkpoint } | SwitchOutcome::PullFailed { checkpoint, .. } => {
                checkpoint
            }
        }
    }

    pub fn warning(&self) -> Option<&CommandError> {
        match self {
            SwitchOutcome::UpToDate { .. } => None,
            SwitchOutcome::PullFailed { warning, .. } => Some(warning),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub branch: BranchName,
    /// Whether a marker commit was undone and its changes put back
    pub restored_marker: bool,
    /// False when the pending checkpoint belongs to another branch and was kept
    pub checkpoint_cleared: bool,
}
