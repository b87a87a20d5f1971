//! Switch and restore state machines
//!
//! A review switch walks `Idle -> Staging -> MarkedWip -> Switched -> Reviewing`.
//! When a step fails, the work done by the earlier steps is undone by the
//! compensations of the phase the failure happened in, and the machine ends in
//! `RolledBack`. Compensations depend only on the failed phase and on whether
//! a marker commit was created, so the table below is the whole rollback policy.
//!
//! | failed in   | compensations                        |
//! |-------------|--------------------------------------|
//! | `Staging`   | unstage                              |
//! | `MarkedWip` | undo marker (if any)                 |
//! | `Switched`  | return to origin, undo marker (if any) |
//!
//! Restoring is linear: `Idle -> Returning -> Restored`.

use crate::areas::runner::{CommandError, GitOutput};
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkpoint::NOTHING_TO_COMMIT_REGEX;
use std::sync::LazyLock;

static NOTHING_TO_COMMIT: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(NOTHING_TO_COMMIT_REGEX).expect("nothing-to-commit regex is valid")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchPhase {
    Idle,
    /// Changes are being staged and committed as the marker
    Staging,
    /// The marker commit exists (or there was nothing to save)
    MarkedWip,
    /// HEAD is on the target branch
    Switched,
    Reviewing,
    RolledBack,
}

impl SwitchPhase {
    /// Reverse actions for a failure in this phase, in execution order
    pub fn compensations(&self, origin: &BranchName, has_marker: bool) -> Vec<Compensation> {
        match self {
            SwitchPhase::Staging => vec![Compensation::Unstage],
            SwitchPhase::MarkedWip if has_marker => vec![Compensation::UndoMarker],
            SwitchPhase::Switched if has_marker => vec![
                Compensation::ReturnToOrigin(origin.clone()),
                Compensation::UndoMarker,
            ],
            SwitchPhase::Switched => vec![Compensation::ReturnToOrigin(origin.clone())],
            _ => Vec::new(),
        }
    }

    pub fn next(&self) -> Option<SwitchPhase> {
        match self {
            SwitchPhase::Idle => Some(SwitchPhase::Staging),
            SwitchPhase::Staging => Some(SwitchPhase::MarkedWip),
            SwitchPhase::MarkedWip => Some(SwitchPhase::Switched),
            SwitchPhase::Switched => Some(SwitchPhase::Reviewing),
            SwitchPhase::Reviewing | SwitchPhase::RolledBack => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestorePhase {
    Idle,
    Returning,
    Restored,
}

impl RestorePhase {
    pub fn next(&self) -> Option<RestorePhase> {
        match self {
            RestorePhase::Idle => Some(RestorePhase::Returning),
            RestorePhase::Returning => Some(RestorePhase::Restored),
            RestorePhase::Restored => None,
        }
    }
}

/// A reverse action taken after a failed switch step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compensation {
    /// Reset the index to HEAD, keeping the working tree
    Unstage,
    /// Drop the marker commit, leaving its changes staged
    UndoMarker,
    /// Check the origin branch out again
    ReturnToOrigin(BranchName),
}

impl Compensation {
    pub fn git_args(&self) -> Vec<&str> {
        match self {
            Compensation::Unstage => vec!["reset", "--quiet"],
            Compensation::UndoMarker => vec!["reset", "--soft", "HEAD~1"],
            Compensation::ReturnToOrigin(branch) => vec!["checkout", branch.as_ref()],
        }
    }

    /// What the compensation does, phrased as an instruction
    pub fn action(&self) -> String {
        match self {
            Compensation::Unstage => "unstage all changes".to_string(),
            Compensation::UndoMarker => "undo the work-in-progress commit".to_string(),
            Compensation::ReturnToOrigin(branch) => format!("switch back to `{branch}`"),
        }
    }
}

impl std::fmt::Display for Compensation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Compensation::Unstage => write!(f, "unstaged all changes"),
            Compensation::UndoMarker => {
                write!(f, "undid the work-in-progress commit, changes are staged")
            }
            Compensation::ReturnToOrigin(branch) => write!(f, "switched back to `{branch}`"),
        }
    }
}

pub fn describe_compensations(compensations: &[Compensation]) -> String {
    if compensations.is_empty() {
        return "nothing to undo".to_string();
    }

    compensations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", then ")
}

/// Result of the marker commit step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitOutcome {
    Created,
    NothingToCommit,
}

impl CommitOutcome {
    /// Tell an empty index apart from a real commit failure
    ///
    /// `git commit` exits non-zero in both cases; only the diagnostic says which.
    pub fn classify(result: Result<GitOutput, CommandError>) -> Result<Self, CommandError> {
        match result {
            Ok(_) => Ok(CommitOutcome::Created),
            Err(error) if NOTHING_TO_COMMIT.is_match(&error.output()) => {
                Ok(CommitOutcome::NothingToCommit)
            }
            Err(error) => Err(error),
        }
    }
}
