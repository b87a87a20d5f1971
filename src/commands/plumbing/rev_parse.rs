use crate::areas::repository::Repository;
use crate::areas::runner::CommandError;
use crate::artifacts::branch::DETACHED_HEAD;
use crate::artifacts::branch::branch_name::BranchName;
use std::path::PathBuf;

impl Repository {
    /// True when the working directory is inside a non-bare working copy
    pub async fn is_repository(&self) -> bool {
        match self
            .runner()
            .run(&["rev-parse", "--is-inside-work-tree"])
            .await
        {
            Ok(output) => output.single_line() == "true",
            Err(error) => {
                tracing::debug!(%error, "not a working copy");
                false
            }
        }
    }

    pub async fn git_dir(&self) -> Result<PathBuf, CommandError> {
        let output = self
            .runner()
            .run(&["rev-parse", "--absolute-git-dir"])
            .await?;

        Ok(PathBuf::from(output.single_line()))
    }

    /// The checked-out branch, or `None` when HEAD is detached
    pub async fn current_branch(&self) -> Result<Option<BranchName>, CommandError> {
        let output = self
            .runner()
            .run(&["rev-parse", "--abbrev-ref", "HEAD"])
            .await?;
        let name = output.single_line();

        if name == DETACHED_HEAD {
            return Ok(None);
        }

        match BranchName::try_parse(name.to_string()) {
            Ok(branch) => Ok(Some(branch)),
            Err(error) => {
                tracing::warn!(%error, "current branch name is not usable");
                Ok(None)
            }
        }
    }

    /// Subject line of the commit at HEAD
    pub async fn last_commit_subject(&self) -> Result<String, CommandError> {
        let output = self
            .runner()
            .run(&["log", "-1", "--pretty=format:%s"])
            .await?;

        Ok(output.single_line().to_string())
    }
}
