use crate::artifacts::branch::{DETACHED_HEAD, INVALID_BRANCH_NAME_REGEX};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static INVALID_BRANCH_NAME: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(INVALID_BRANCH_NAME_REGEX).expect("branch name regex is valid")
});

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BranchNameError {
    #[error("branch name cannot be empty")]
    Empty,
    #[error("invalid branch name: {0}")]
    Invalid(String),
}

/// A local branch name that passes git's ref-format rules
///
/// Every name handed to `git checkout`, `git pull` or persisted in a checkpoint
/// goes through `try_parse` first, so arguments that look like options (`-f`)
/// or revision expressions (`main~1`) never reach git.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct BranchName(String);

impl BranchName {
    pub fn try_parse(name: String) -> Result<Self, BranchNameError> {
        if name.is_empty() {
            return Err(BranchNameError::Empty);
        }

        if INVALID_BRANCH_NAME.is_match(&name) || name == DETACHED_HEAD {
            Err(BranchNameError::Invalid(name))
        } else {
            Ok(Self(name))
        }
    }
}

impl TryFrom<String> for BranchName {
    type Error = BranchNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::try_parse(value)
    }
}

impl From<BranchName> for String {
    fn from(value: BranchName) -> Self {
        value.0
    }
}

impl std::str::FromStr for BranchName {
    type Err = BranchNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_parse(s.to_string())
    }
}

impl AsRef<str> for BranchName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for BranchName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
