use crate::common::file::{FileSpec, write_file};
use crate::common::{MAIN_BRANCH, REVIEW_BRANCH};
use assert_cmd::Command;
use assert_fs::TempDir;
use derive_new::new;
use rstest::fixture;
use std::path::{Path, PathBuf};

/// Temp directory holding a bare `origin`, a working clone and a second clone
/// used to push upstream changes
#[derive(Debug)]
pub struct Sandbox {
    // kept alive until the test ends
    _dir: TempDir,
    root: PathBuf,
    author: RandomAuthor,
}

impl Sandbox {
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn origin_dir(&self) -> PathBuf {
        self.root.join("origin.git")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.join("work")
    }

    pub fn upstream_dir(&self) -> PathBuf {
        self.root.join("upstream")
    }

    /// An empty directory that is not inside any working copy
    pub fn plain_dir(&self) -> PathBuf {
        let dir = self.root.join("plain");
        std::fs::create_dir_all(&dir)
            .unwrap_or_else(|e| panic!("Failed to create directory {:?}: {}", dir, e));
        dir
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join("castor.json")
    }

    fn apply_env(&self, cmd: &mut Command) {
        cmd.envs(vec![
            ("HOME", self.root.as_os_str()),
            ("XDG_CONFIG_HOME", self.root.join(".config").as_os_str()),
            ("GIT_CEILING_DIRECTORIES", self.root.as_os_str()),
            ("CASTOR_CONFIG", self.config_path().as_os_str()),
        ]);
        cmd.envs(vec![
            ("GIT_CONFIG_NOSYSTEM", "1"),
            ("GIT_TERMINAL_PROMPT", "0"),
            ("GIT_AUTHOR_NAME", self.author.name.as_str()),
            ("GIT_AUTHOR_EMAIL", self.author.email.as_str()),
            ("GIT_COMMITTER_NAME", self.author.name.as_str()),
            ("GIT_COMMITTER_EMAIL", self.author.email.as_str()),
        ]);
        cmd.env_remove("CASTOR_LOG");
    }
}

#[derive(Debug, Clone, new)]
struct RandomAuthor {
    name: String,
    email: String,
}

fn generate_random_author() -> RandomAuthor {
    use fake::Fake;
    use fake::faker::internet::en::FreeEmail;
    use fake::faker::name::en::Name;

    let name = Name().fake::<String>().replace(" ", "_");
    let email = FreeEmail().fake::<String>();
    RandomAuthor::new(name, email)
}

#[fixture]
pub fn sandbox() -> Sandbox {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let root = dir
        .path()
        .canonicalize()
        .expect("Failed to canonicalize temp dir");

    Sandbox {
        _dir: dir,
        root,
        author: generate_random_author(),
    }
}

/// `origin` has `main` with one commit and `feature-9` one commit ahead of it;
/// `work` is a clone with both branches, checked out on `main`
#[fixture]
pub fn review_sandbox(sandbox: Sandbox) -> Sandbox {
    let root = sandbox.root().to_path_buf();
    let work = sandbox.work_dir();

    run_git_command(&sandbox, &root, &["init", "--quiet", "--bare", "origin.git"])
        .assert()
        .success();
    run_git_command(
        &sandbox,
        &sandbox.origin_dir(),
        &["symbolic-ref", "HEAD", "refs/heads/main"],
    )
    .assert()
    .success();
    run_git_command(&sandbox, &root, &["clone", "--quiet", "origin.git", "work"])
        .assert()
        .success();
    run_git_command(&sandbox, &work, &["symbolic-ref", "HEAD", "refs/heads/main"])
        .assert()
        .success();

    write_file(FileSpec::new(work.join("README.md"), "hello\n".to_string()));
    git_commit(&sandbox, &work, "Initial commit");
    run_git_command(&sandbox, &work, &["push", "--quiet", "origin", MAIN_BRANCH])
        .assert()
        .success();

    run_git_command(&sandbox, &work, &["checkout", "--quiet", "-b", REVIEW_BRANCH])
        .assert()
        .success();
    write_file(FileSpec::new(
        work.join("feature.txt"),
        "feature 9\n".to_string(),
    ));
    git_commit(&sandbox, &work, "Add feature 9");
    run_git_command(&sandbox, &work, &["push", "--quiet", "origin", REVIEW_BRANCH])
        .assert()
        .success();
    run_git_command(&sandbox, &work, &["checkout", "--quiet", MAIN_BRANCH])
        .assert()
        .success();

    sandbox
}

/// Commit a change to `feature-9` from a second clone, so `work` is behind `origin`
pub fn push_upstream_change(sandbox: &Sandbox, file_name: &str, content: &str) {
    let root = sandbox.root().to_path_buf();
    let upstream = sandbox.upstream_dir();

    if !upstream.exists() {
        run_git_command(sandbox, &root, &["clone", "--quiet", "origin.git", "upstream"])
            .assert()
            .success();
    }

    run_git_command(sandbox, &upstream, &["checkout", "--quiet", REVIEW_BRANCH])
        .assert()
        .success();
    write_file(FileSpec::new(upstream.join(file_name), content.to_string()));
    git_commit(sandbox, &upstream, "Upstream change");
    run_git_command(sandbox, &upstream, &["push", "--quiet", "origin", REVIEW_BRANCH])
        .assert()
        .success();
}

pub fn run_castor_command(sandbox: &Sandbox, dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::cargo_bin("castor").expect("Failed to find castor binary");
    sandbox.apply_env(&mut cmd);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn run_git_command(sandbox: &Sandbox, dir: &Path, args: &[&str]) -> Command {
    let mut cmd = Command::new("git");
    sandbox.apply_env(&mut cmd);
    cmd.current_dir(dir);
    for arg in args {
        cmd.arg(arg);
    }
    cmd
}

pub fn git_commit(sandbox: &Sandbox, dir: &Path, message: &str) {
    run_git_command(sandbox, dir, &["add", "--all"])
        .assert()
        .success();
    run_git_command(sandbox, dir, &["commit", "--quiet", "-m", message])
        .assert()
        .success();
}

/// Trimmed stdout of a git command that must succeed
pub fn git_stdout(sandbox: &Sandbox, dir: &Path, args: &[&str]) -> String {
    let output = run_git_command(sandbox, dir, args)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    String::from_utf8(output)
        .expect("git output is not utf-8")
        .trim_end()
        .to_string()
}

pub fn current_branch(sandbox: &Sandbox, dir: &Path) -> String {
    git_stdout(sandbox, dir, &["rev-parse", "--abbrev-ref", "HEAD"])
}

pub fn last_commit_subject(sandbox: &Sandbox, dir: &Path) -> String {
    git_stdout(sandbox, dir, &["log", "-1", "--pretty=format:%s"])
}

pub fn porcelain_status(sandbox: &Sandbox, dir: &Path) -> String {
    git_stdout(sandbox, dir, &["status", "--porcelain"])
}

pub fn checkpoint_path(sandbox: &Sandbox) -> PathBuf {
    sandbox
        .work_dir()
        .join(".git")
        .join("castor")
        .join("checkpoint.json")
}
