//! Git command execution
//!
//! Every interaction with the working copy goes through a [`GitRunner`]. The
//! production implementation, [`ProcessRunner`], spawns the `git` executable
//! once per call and waits for it to exit before returning. Nothing is retried
//! and the output is handed back verbatim; interpreting it is the caller's job.
//!
//! Children run with `LC_ALL=C` so diagnostics such as "nothing to commit" are
//! stable regardless of the user's locale.

use async_trait::async_trait;
use derive_new::new;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

const GIT_BINARY: &str = "git";

/// Captured output of a successful git invocation
#[derive(Debug, Clone, Default, PartialEq, Eq, new)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

impl GitOutput {
    /// Stdout with trailing line terminators removed
    pub fn single_line(&self) -> &str {
        self.stdout.trim_end_matches(['\n', '\r'])
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to start `git {command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`git {command}` exited with {}: {diagnostic}", describe_code(.code))]
    Exit {
        command: String,
        code: Option<i32>,
        stdout: String,
        stderr: String,
        diagnostic: String,
    },
    #[error("`git {command}` did not finish within {timeout:?}")]
    TimedOut { command: String, timeout: Duration },
}

impl CommandError {
    pub fn exit(command: String, code: Option<i32>, stdout: String, stderr: String) -> Self {
        let diagnostic = match (stderr.trim(), stdout.trim()) {
            ("", "") => "no output".to_string(),
            ("", stdout) => stdout.to_string(),
            (stderr, _) => stderr.to_string(),
        };

        CommandError::Exit {
            command,
            code,
            stdout,
            stderr,
            diagnostic,
        }
    }

    /// Stdout and stderr of a failed command, concatenated
    ///
    /// Empty for failures that never produced output (spawn errors, timeouts).
    pub fn output(&self) -> String {
        match self {
            CommandError::Exit { stdout, stderr, .. } => format!("{stdout}{stderr}"),
            _ => String::new(),
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (killed by signal)".to_string(),
    }
}

#[async_trait]
pub trait GitRunner: Send + Sync {
    async fn run(&self, args: &[&str]) -> Result<GitOutput, CommandError>;
}

/// Runs the real `git` executable inside a working directory
#[derive(Debug, Clone, new)]
pub struct ProcessRunner {
    workdir: PathBuf,
    timeout: Option<Duration>,
}

#[async_trait]
impl GitRunner for ProcessRunner {
    async fn run(&self, args: &[&str]) -> Result<GitOutput, CommandError> {
        let command = args.join(" ");
        tracing::debug!(%command, workdir = %self.workdir.display(), "running git");

        let mut child = tokio::process::Command::new(GIT_BINARY);
        child
            .args(args)
            .current_dir(&self.workdir)
            .env("LC_ALL", "C")
            .stdin(Stdio::null())
            .kill_on_drop(true);

        let output = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, child.output())
                .await
                .map_err(|_| CommandError::TimedOut {
                    command: command.clone(),
                    timeout,
                })?,
            None => child.output().await,
        }
        .map_err(|source| CommandError::Spawn {
            command: command.clone(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if output.status.success() {
            Ok(GitOutput::new(stdout, stderr))
        } else {
            tracing::debug!(%command, code = ?output.status.code(), "git failed");
            Err(CommandError::exit(command, output.status.code(), stdout, stderr))
        }
    }
}
