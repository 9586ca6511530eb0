//! Test infrastructure for git-tidy-rust integration tests.
#![allow(dead_code)]

use anyhow::Result;
use git_tidy_rust::git::run_git;
use git_tidy_rust::maintenance::MaintenanceCallbacks;
use git_tidy_rust::repository::{CheckoutError, FetchOutcome, RemoteError, Repository};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary git repository for testing.
/// Automatically cleaned up when dropped.
pub struct TestRepo {
    _temp_dir: TempDir,
    path: PathBuf,
    remote: Option<TempDir>,
}

impl TestRepo {
    /// Creates a new test repository with an initial commit on the master branch.
    pub fn new() -> Result<Self> {
        Self::with_initial_branch("master")
    }

    pub fn with_initial_branch(branch: &str) -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let path = temp_dir.path().to_path_buf();
        init_repo(&path, branch)?;

        Ok(Self {
            _temp_dir: temp_dir,
            path,
            remote: None,
        })
    }

    /// Creates a test repository with a bare `origin` remote that has the
    /// initial branch pushed to it.
    pub fn with_remote(initial_branch: Option<&str>) -> Result<Self> {
        let branch = initial_branch.unwrap_or("master");
        let remote_dir = TempDir::new()?;
        run_git(remote_dir.path(), &["init", "--bare", "-b", branch])?;

        let mut local = Self::with_initial_branch(branch)?;
        let remote_path = remote_dir.path().to_string_lossy().to_string();
        run_git(&local.path, &["remote", "add", "origin", &remote_path])?;
        run_git(&local.path, &["push", "-u", "origin", branch])?;

        local.remote = Some(remote_dir);
        Ok(local)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn remote_path(&self) -> Option<&Path> {
        self.remote.as_ref().map(TempDir::path)
    }

    /// Creates a branch at HEAD without switching to it.
    pub fn create_branch(&self, name: &str) -> Result<()> {
        run_git(&self.path, &["branch", name])?;
        Ok(())
    }

    /// Creates a branch carrying one commit that is not merged anywhere.
    pub fn create_unmerged_branch(&self, name: &str) -> Result<()> {
        let original = run_git(&self.path, &["rev-parse", "--abbrev-ref", "HEAD"])?;
        run_git(&self.path, &["checkout", "-b", name])?;
        let file = format!("{}.txt", name.replace('/', "-"));
        std::fs::write(self.path.join(&file), "work in progress\n")?;
        run_git(&self.path, &["add", &file])?;
        run_git(&self.path, &["commit", "-m", "Unmerged work"])?;
        run_git(&self.path, &["checkout", &original])?;
        Ok(())
    }

    pub fn checkout(&self, name: &str) -> Result<()> {
        run_git(&self.path, &["checkout", name])?;
        Ok(())
    }

    pub fn push_branch(&self, name: &str) -> Result<()> {
        run_git(&self.path, &["push", "-u", "origin", name])?;
        Ok(())
    }

    /// Deletes a branch on the remote side only, as a merged pull request would.
    pub fn delete_branch_on_remote(&self, name: &str) -> Result<()> {
        let remote = self
            .remote_path()
            .ok_or_else(|| anyhow::anyhow!("repository has no remote"))?;
        run_git(remote, &["branch", "-D", name])?;
        Ok(())
    }

    /// Adds a branch directly on the remote side.
    pub fn create_branch_on_remote(&self, name: &str, start: &str) -> Result<()> {
        let remote = self
            .remote_path()
            .ok_or_else(|| anyhow::anyhow!("repository has no remote"))?;
        run_git(remote, &["branch", name, start])?;
        Ok(())
    }

    /// Deletes the remote directory while keeping the `origin` configuration.
    pub fn make_remote_unreachable(&mut self) {
        self.remote = None;
    }

    pub fn local_branches(&self) -> Result<Vec<String>> {
        let output = run_git(
            &self.path,
            &["for-each-ref", "--format=%(refname:short)", "refs/heads/"],
        )?;
        Ok(output.lines().map(str::to_string).collect())
    }

    pub fn current_branch(&self) -> Result<String> {
        run_git(&self.path, &["rev-parse", "--abbrev-ref", "HEAD"])
    }
}

pub fn init_repo(path: &Path, branch: &str) -> Result<()> {
    run_git(path, &["init", "-b", branch])?;
    run_git(path, &["config", "user.email", "test@example.com"])?;
    run_git(path, &["config", "user.name", "Test User"])?;
    std::fs::write(path.join("README.md"), "# Test Repo\n")?;
    run_git(path, &["add", "README.md"])?;
    run_git(path, &["commit", "-m", "Initial commit"])?;
    Ok(())
}

pub fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Calls that change repository state, in the order they were made.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Checkout(String),
    Fetch(String),
    Delete(String),
}

#[derive(Debug, Clone)]
pub enum FakeFetch {
    Updated,
    AlreadyUpToDate,
    Fails(&'static str),
}

/// In-memory repository for driving the workflow without git.
#[derive(Debug)]
pub struct FakeRepository {
    pub local: Vec<String>,
    pub current: String,
    pub remotes: HashMap<String, HashSet<String>>,
    pub fetch: FakeFetch,
    pub broken_checkout: Option<String>,
    pub undeletable: HashSet<String>,
    pub calls: Vec<Call>,
}

impl FakeRepository {
    pub fn new(local: &[&str], current: &str) -> Self {
        Self {
            local: names(local),
            current: current.to_string(),
            remotes: HashMap::new(),
            fetch: FakeFetch::Updated,
            broken_checkout: None,
            undeletable: HashSet::new(),
            calls: Vec::new(),
        }
    }

    pub fn with_remote(mut self, name: &str, branches: &[&str]) -> Self {
        self.remotes.insert(
            name.to_string(),
            branches.iter().map(|b| b.to_string()).collect(),
        );
        self
    }

    pub fn with_fetch(mut self, fetch: FakeFetch) -> Self {
        self.fetch = fetch;
        self
    }

    pub fn with_broken_checkout(mut self, branch: &str) -> Self {
        self.broken_checkout = Some(branch.to_string());
        self
    }

    pub fn refusing_delete(mut self, branch: &str) -> Self {
        self.undeletable.insert(branch.to_string());
        self
    }

    pub fn deletions(&self) -> Vec<String> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Delete(branch) => Some(branch.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn fetched(&self) -> bool {
        self.calls.iter().any(|call| matches!(call, Call::Fetch(_)))
    }
}

impl Repository for FakeRepository {
    fn checkout(&mut self, branch: &str) -> Result<(), CheckoutError> {
        self.calls.push(Call::Checkout(branch.to_string()));
        if self.broken_checkout.as_deref() == Some(branch) {
            return Err(CheckoutError::Failed {
                branch: branch.to_string(),
                cause: anyhow::anyhow!("local changes would be overwritten"),
            });
        }
        if !self.local.iter().any(|b| b == branch) {
            return Err(CheckoutError::NotFound {
                branch: branch.to_string(),
            });
        }
        self.current = branch.to_string();
        Ok(())
    }

    fn fetch_prune(&mut self, remote: &str) -> anyhow::Result<FetchOutcome> {
        self.calls.push(Call::Fetch(remote.to_string()));
        match self.fetch {
            FakeFetch::Updated => Ok(FetchOutcome::Updated),
            FakeFetch::AlreadyUpToDate => Ok(FetchOutcome::AlreadyUpToDate),
            FakeFetch::Fails(reason) => anyhow::bail!("{}", reason),
        }
    }

    fn local_branches(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.local.clone())
    }

    fn remote_branches(&self, remote: &str) -> Result<HashSet<String>, RemoteError> {
        self.remotes
            .get(remote)
            .cloned()
            .ok_or_else(|| RemoteError::NotConfigured {
                remote: remote.to_string(),
            })
    }

    fn current_branch(&self) -> anyhow::Result<String> {
        Ok(self.current.clone())
    }

    fn delete_branch(&mut self, branch: &str) -> anyhow::Result<()> {
        self.calls.push(Call::Delete(branch.to_string()));
        if self.undeletable.contains(branch) {
            anyhow::bail!("the branch '{}' is not fully merged", branch);
        }
        if branch == self.current {
            anyhow::bail!("cannot delete the checked out branch '{}'", branch);
        }
        self.local.retain(|b| b != branch);
        Ok(())
    }
}

/// Callbacks that remember what the workflow reported.
#[derive(Debug, Default)]
pub struct RecordingCallbacks {
    pub stale_reported: RefCell<Option<Vec<String>>>,
    pub fetch_warnings: RefCell<Vec<String>>,
    pub deleted: RefCell<Vec<String>>,
}

impl MaintenanceCallbacks for RecordingCallbacks {
    fn on_fetch_skipped(&self, _remote: &str, error: &anyhow::Error) {
        self.fetch_warnings.borrow_mut().push(format!("{error:#}"));
    }

    fn on_stale_branches(&self, branches: &[String]) {
        *self.stale_reported.borrow_mut() = Some(branches.to_vec());
    }

    fn on_branch_deleted(&self, branch: &str) {
        self.deleted.borrow_mut().push(branch.to_string());
    }
}
