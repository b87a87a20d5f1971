//! Pending review checkpoint
//!
//! The checkpoint lives inside the repository's git directory
//! (`<git-dir>/castor/checkpoint.json`), which keeps it out of `git add --all`
//! and scopes it to one working copy.
//!
//! ## Writes
//!
//! The record is serialized to a sibling temp file under an exclusive lock,
//! flushed to disk, then renamed over the real path, so readers see either the
//! previous record or the new one.

use crate::artifacts::checkpoint::checkpoint::Checkpoint;
use derive_new::new;
use file_guard::Lock;
use std::io::Write;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

const CHECKPOINT_DIR: &str = "castor";
const CHECKPOINT_FILE: &str = "checkpoint.json";
const TEMP_SUFFIX: &str = "tmp";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("checkpoint file {path:?} is unreadable")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("checkpoint file {path:?} is corrupt, delete it to discard the pending review")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[derive(Debug, new)]
pub struct CheckpointStore {
    /// Path to the checkpoint file
    path: Box<Path>,
}

impl CheckpointStore {
    pub fn for_git_dir(git_dir: &Path) -> Self {
        Self::new(
            git_dir
                .join(CHECKPOINT_DIR)
                .join(CHECKPOINT_FILE)
                .into_boxed_path(),
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Option<Checkpoint>, StoreError> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(error) => return Err(StoreError::io(&self.path, error)),
        };

        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| StoreError::Corrupt {
                path: self.path.to_path_buf(),
                source,
            })
    }

    pub fn save(&self, checkpoint: &Checkpoint) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(checkpoint).map_err(|source| {
            StoreError::Corrupt {
                path: self.path.to_path_buf(),
                source,
            }
        })?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let temp_path = self.path.with_extension(TEMP_SUFFIX);
        self.write_locked(&temp_path, &content)
            .map_err(|e| StoreError::io(&temp_path, e))?;
        std::fs::rename(&temp_path, &self.path).map_err(|e| StoreError::io(&self.path, e))?;

        tracing::debug!(path = %self.path.display(), "checkpoint saved");
        Ok(())
    }

    /// Remove the record; clearing an absent record is not an error
    pub fn clear(&self) -> Result<(), StoreError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "checkpoint cleared");
                Ok(())
            }
            Err(error) if error.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(StoreError::io(&self.path, error)),
        }
    }

    fn write_locked(&self, path: &Path, content: &[u8]) -> std::io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(path)?;
        let mut lock = file_guard::lock(&mut file, Lock::Exclusive, 0, 1)?;
        lock.deref_mut().write_all(content)?;
        lock.deref_mut().sync_all()?;

        Ok(())
    }
}
