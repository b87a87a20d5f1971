use crate::areas::repository::Repository;
use crate::areas::runner::CommandError;
use crate::artifacts::remote::DEFAULT_REMOTE;
use crate::artifacts::remote::remote_url::{RemoteDescriptor, RemoteUrlError, parse_owner_repo};
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("not inside a git working copy")]
    NotARepository,
    #[error("could not read the url of remote `{remote}`")]
    UrlLookupFailed {
        remote: &'static str,
        #[source]
        source: CommandError,
    },
    #[error(transparent)]
    Malformed(#[from] RemoteUrlError),
}

impl Repository {
    pub async fn remote_url(&self) -> Result<String, CommandError> {
        let output = self
            .runner()
            .run(&["remote", "get-url", DEFAULT_REMOTE])
            .await?;

        Ok(output.single_line().to_string())
    }

    /// Owner and repository name of `origin`, used to look up its pull requests
    pub async fn owner_and_repo(&self) -> Result<RemoteDescriptor, RemoteError> {
        if !self.is_repository().await {
            return Err(RemoteError::NotARepository);
        }

        let url = self
            .remote_url()
            .await
            .map_err(|source| RemoteError::UrlLookupFailed {
                remote: DEFAULT_REMOTE,
                source,
            })?;

        Ok(parse_owner_repo(&url)?)
    }

    pub async fn show_remote(&self) -> anyhow::Result<()> {
        let descriptor = self.owner_and_repo().await?;
        writeln!(self.writer(), "{descriptor}")?;

        Ok(())
    }
}
