use crate::areas::checkpoints::CheckpointStore;
use crate::areas::runner::{CommandError, GitRunner};
use std::cell::{RefCell, RefMut};
use std::io::Write;

pub struct Repository {
    writer: RefCell<Box<dyn std::io::Write>>,
    runner: Box<dyn GitRunner>,
}

impl Repository {
    pub fn new(writer: Box<dyn std::io::Write>, runner: Box<dyn GitRunner>) -> Self {
        Repository {
            writer: RefCell::new(writer),
            runner,
        }
    }

    pub fn writer(&'_ self) -> RefMut<'_, Box<dyn std::io::Write>> {
        self.writer.borrow_mut()
    }

    pub fn runner(&self) -> &dyn GitRunner {
        self.runner.as_ref()
    }

    pub async fn checkpoints(&self) -> Result<CheckpointStore, CommandError> {
        let git_dir = self.git_dir().await?;
        Ok(CheckpointStore::for_git_dir(&git_dir))
    }

    /// Write a line of progress text
    ///
    /// Progress is informational, so a closed or failing writer is logged
    /// rather than aborting a half-finished operation.
    pub(crate) fn progress(&self, line: impl std::fmt::Display) {
        if let Err(error) = writeln!(self.writer(), "{line}") {
            tracing::warn!(%error, "failed to write progress output");
        }
    }
}
