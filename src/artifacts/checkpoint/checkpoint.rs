use crate::artifacts::branch::branch_name::BranchName;
use chrono::{DateTime, Utc};
use derive_new::new;
use serde::{Deserialize, Serialize};

/// Branch a review switches to
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct PrTarget {
    head_ref: BranchName,
}

impl PrTarget {
    pub fn head_ref(&self) -> &BranchName {
        &self.head_ref
    }
}

/// Where a pending review started
///
/// Written once the branch switch succeeds and deleted once `back` has
/// returned to `origin_branch`. At most one exists per working copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct Checkpoint {
    origin_branch: BranchName,
    target_branch: BranchName,
    has_marker_commit: bool,
    created_at: DateTime<Utc>,
}

impl Checkpoint {
    pub fn origin_branch(&self) -> &BranchName {
        &self.origin_branch
    }

    pub fn target_branch(&self) -> &BranchName {
        &self.target_branch
    }

    pub fn has_marker_commit(&self) -> bool {
        self.has_marker_commit
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
