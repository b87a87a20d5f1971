use crate::areas::repository::Repository;
use crate::artifacts::branch::branch_name::BranchName;
use crate::artifacts::checkpoint::WIP_SENTINEL;
use crate::artifacts::checkpoint::error::RestoreError;
use crate::artifacts::checkpoint::outcome::RestoreOutcome;
use crate::artifacts::checkpoint::transition::RestorePhase;
use colored::Colorize;

impl Repository {
    /// Return to the branch a review started from and unpack its saved work
    ///
    /// The branch comes from `branch` when given, otherwise from the pending
    /// checkpoint. The tip commit is only undone when its subject is the
    /// work-in-progress sentinel, so history committed on top of it is never
    /// rewritten. Going back to a branch other than the recorded origin keeps
    /// the checkpoint, since the saved work still sits on the origin.
    pub async fn go_back(&self, branch: Option<&BranchName>) -> Result<RestoreOutcome, RestoreError> {
        if !self.is_repository().await {
            return Err(RestoreError::NotARepository);
        }

        let store = self
            .checkpoints()
            .await
            .map_err(RestoreError::GitDirLookupFailed)?;
        let pending = store.load()?;
        let branch = match (branch, &pending) {
            (Some(branch), _) => branch.clone(),
            (None, Some(checkpoint)) => checkpoint.origin_branch().clone(),
            (None, None) => return Err(RestoreError::NoPendingCheckpoint),
        };
        let pending_elsewhere = pending
            .as_ref()
            .filter(|checkpoint| checkpoint.origin_branch() != &branch);

        let mut phase = RestorePhase::Idle;
        advance(&mut phase, &branch);
        self.progress(format!("Going back to branch `{branch}`"));

        self.runner()
            .run(&["checkout", branch.as_ref()])
            .await
            .map_err(|source| RestoreError::BranchSwitchFailed {
                branch: branch.clone(),
                source,
            })?;

        let subject = self.last_commit_subject().await.map_err(|source| {
            RestoreError::LastCommitLookupFailed {
                branch: branch.clone(),
                source,
            }
        })?;

        let restored_marker = subject == WIP_SENTINEL;
        if restored_marker {
            self.runner()
                .run(&["reset", "--quiet", "HEAD~1"])
                .await
                .map_err(|source| RestoreError::UndoMarkerFailed {
                    branch: branch.clone(),
                    source,
                })?;
            self.progress("Restored work in progress");
        } else if pending_elsewhere.is_none()
            && pending.as_ref().is_some_and(|cp| cp.has_marker_commit())
        {
            tracing::warn!(%branch, %subject, "saved work is no longer at the branch tip");
            self.progress(
                format!(
                    "Work in progress is no longer the last commit on `{branch}`, history left untouched"
                )
                .yellow(),
            );
        }

        let checkpoint_cleared = match pending_elsewhere {
            Some(checkpoint) => {
                let origin = checkpoint.origin_branch();
                tracing::info!(%branch, %origin, "checkpoint kept for the origin branch");
                self.progress(
                    format!(
                        "Review started from `{origin}` is still pending, run `castor back` to return to it"
                    )
                    .yellow(),
                );
                false
            }
            None => {
                store.clear()?;
                true
            }
        };

        advance(&mut phase, &branch);
        self.progress("Success!".green().bold());

        Ok(RestoreOutcome {
            branch,
            restored_marker,
            checkpoint_cleared,
        })
    }
}

fn advance(phase: &mut RestorePhase, branch: &BranchName) {
    if let Some(next) = phase.next() {
        *phase = next;
        tracing::debug!(?phase, %branch, "restore transition");
    }
}

#[cfg(test)]
mod tests {
    use crate::areas::checkpoints::CheckpointStore;
    use crate::areas::repository::testing::scripted_repository;
    use crate::areas::runner::scripted::ScriptedRunner;
    use crate::artifacts::branch::branch_name::BranchName;
    use crate::artifacts::checkpoint::checkpoint::Checkpoint;
    use crate::artifacts::checkpoint::error::RestoreError;
    use assert_fs::TempDir;
    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};

    const LAST_SUBJECT: &str = "log -1 --pretty=format:%s";

    #[fixture]
    fn git_dir() -> TempDir {
        TempDir::new().expect("Failed to create temp dir")
    }

    fn branch(name: &str) -> BranchName {
        BranchName::try_parse(name.to_string()).unwrap()
    }

    fn pending_review(git_dir: &TempDir, has_marker: bool) -> CheckpointStore {
        let store = CheckpointStore::for_git_dir(git_dir.path());
        store
            .save(&Checkpoint::new(
                branch("main"),
                branch("feature-9"),
                has_marker,
                chrono::Utc::now(),
            ))
            .unwrap();
        store
    }

    #[rstest]
    #[tokio::test]
    async fn returns_to_origin_and_unpacks_marker(git_dir: TempDir) {
        let store = pending_review(&git_dir, true);
        let runner = ScriptedRunner::on_branch(git_dir.path(), "feature-9")
            .reply(LAST_SUBJECT, "[CASTOR WIP]");
        let (repository, output) = scripted_repository(&runner);

        let outcome = repository.go_back(None).await.unwrap();

        assert_eq!(outcome.branch, branch("main"));
        assert!(outcome.restored_marker);
        assert!(outcome.checkpoint_cleared);
        assert_eq!(
            runner.mutations(),
            vec!["checkout main", "reset --quiet HEAD~1"]
        );
        assert_eq!(store.load().unwrap(), None);
        assert!(output.contents().contains("Going back to branch `main`"));
    }

    #[rstest]
    #[tokio::test]
    async fn history_is_untouched_without_sentinel(git_dir: TempDir) {
        let store = pending_review(&git_dir, false);
        let runner = ScriptedRunner::on_branch(git_dir.path(), "feature-9")
            .reply(LAST_SUBJECT, "Add login form");
        let (repository, _) = scripted_repository(&runner);

        let outcome = repository.go_back(None).await.unwrap();

        assert!(!outcome.restored_marker);
        assert_eq!(runner.mutations(), vec!["checkout main"]);
        assert_eq!(store.load().unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn buried_marker_is_left_alone(git_dir: TempDir) {
        pending_review(&git_dir, true);
        let runner = ScriptedRunner::on_branch(git_dir.path(), "feature-9")
            .reply(LAST_SUBJECT, "Commit made on top of the marker");
        let (repository, output) = scripted_repository(&runner);

        let outcome = repository.go_back(None).await.unwrap();

        assert!(!outcome.restored_marker);
        assert_eq!(runner.mutations(), vec!["checkout main"]);
        assert!(output.contents().contains("history left untouched"));
    }

    #[rstest]
    #[tokio::test]
    async fn no_checkpoint_fails_without_mutation(git_dir: TempDir) {
        let runner = ScriptedRunner::on_branch(git_dir.path(), "main");
        let (repository, _) = scripted_repository(&runner);

        let error = repository.go_back(None).await.unwrap_err();

        assert!(matches!(error, RestoreError::NoPendingCheckpoint));
        assert!(runner.mutations().is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn explicit_branch_overrides_checkpoint(git_dir: TempDir) {
        let runner = ScriptedRunner::on_branch(git_dir.path(), "feature-9")
            .reply(LAST_SUBJECT, "[CASTOR WIP]");
        let (repository, _) = scripted_repository(&runner);

        let outcome = repository.go_back(Some(&branch("develop"))).await.unwrap();

        assert_eq!(outcome.branch, branch("develop"));
        assert_eq!(
            runner.mutations(),
            vec!["checkout develop", "reset --quiet HEAD~1"]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn detour_to_another_branch_keeps_the_checkpoint(git_dir: TempDir) {
        let store = pending_review(&git_dir, true);
        let runner = ScriptedRunner::on_branch(git_dir.path(), "main")
            .reply(LAST_SUBJECT, "Add feature 9");
        let (repository, output) = scripted_repository(&runner);

        let outcome = repository.go_back(Some(&branch("feature-9"))).await.unwrap();

        assert!(!outcome.restored_marker);
        assert!(!outcome.checkpoint_cleared);
        assert_eq!(runner.mutations(), vec!["checkout feature-9"]);
        assert_eq!(
            store.load().unwrap().map(|cp| cp.origin_branch().clone()),
            Some(branch("main"))
        );
        let contents = output.contents();
        assert!(contents.contains("Review started from `main` is still pending"));
        assert!(!contents.contains("history left untouched"));
    }

    #[rstest]
    #[tokio::test]
    async fn explicit_origin_branch_clears_the_checkpoint(git_dir: TempDir) {
        let store = pending_review(&git_dir, true);
        let runner = ScriptedRunner::on_branch(git_dir.path(), "feature-9")
            .reply(LAST_SUBJECT, "[CASTOR WIP]");
        let (repository, _) = scripted_repository(&runner);

        let outcome = repository.go_back(Some(&branch("main"))).await.unwrap();

        assert!(outcome.restored_marker);
        assert!(outcome.checkpoint_cleared);
        assert_eq!(store.load().unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn failed_checkout_keeps_the_checkpoint(git_dir: TempDir) {
        let store = pending_review(&git_dir, true);
        let runner = ScriptedRunner::on_branch(git_dir.path(), "feature-9").fail(
            "checkout main",
            "error: Your local changes to the following files would be overwritten by checkout",
        );
        let (repository, _) = scripted_repository(&runner);

        let error = repository.go_back(None).await.unwrap_err();

        assert!(matches!(error, RestoreError::BranchSwitchFailed { .. }));
        assert_eq!(runner.mutations(), vec!["checkout main"]);
        assert!(store.load().unwrap().is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn failed_undo_keeps_the_checkpoint_for_a_retry(git_dir: TempDir) {
        let store = pending_review(&git_dir, true);
        let runner = ScriptedRunner::on_branch(git_dir.path(), "feature-9")
            .reply(LAST_SUBJECT, "[CASTOR WIP]")
            .fail("reset --quiet HEAD~1", "fatal: ambiguous argument 'HEAD~1'");
        let (repository, _) = scripted_repository(&runner);

        let error = repository.go_back(None).await.unwrap_err();

        assert!(matches!(error, RestoreError::UndoMarkerFailed { .. }));
        assert!(store.load().unwrap().is_some());
    }
}
