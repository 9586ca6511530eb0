//! Git command wrappers.
//!
//! This module provides a thin wrapper around git CLI commands and the
//! [`GitRepository`] backend that implements [`Repository`] on top of them.

use crate::constants::{HEADS_PREFIX, REMOTES_PREFIX, REMOTE_HEAD};
use crate::repository::{CheckoutError, FetchOutcome, RemoteError, Repository};
use crate::stale::short_branch_name;
use anyhow::Context;
use colored::Colorize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Callback invoked with the arguments of every git command before it runs.
pub type GitLogger = fn(&[&str]);

pub fn verbose_logger(args: &[&str]) {
    eprintln!("  {}", format!("$ git {}", args.join(" ")).dimmed());
}

pub fn no_op_logger(_args: &[&str]) {}

/// Captured output of a finished git command.
#[derive(Debug)]
pub struct GitOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Runs git in `repo` and returns its output regardless of exit status.
pub fn run_git_output(repo: &Path, args: &[&str]) -> anyhow::Result<GitOutput> {
    let output = std::process::Command::new("git")
        .current_dir(repo)
        .args(args)
        .env("GIT_TERMINAL_PROMPT", "0")
        .output()
        .context("Failed to spawn git command")?;

    Ok(GitOutput {
        success: output.status.success(),
        stdout: String::from_utf8_lossy(&output.stdout).trim().to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
    })
}

/// Runs git in `repo` and returns trimmed stdout, failing on a non-zero exit.
pub fn run_git(repo: &Path, args: &[&str]) -> anyhow::Result<String> {
    let output = run_git_output(repo, args)?;
    if output.success {
        Ok(output.stdout)
    } else {
        anyhow::bail!("git {} failed: {}", args.join(" "), output.stderr)
    }
}

fn validate_name(kind: &str, name: &str) -> anyhow::Result<()> {
    if name.is_empty() || name.starts_with('-') || name.contains(['\0', '\n']) {
        anyhow::bail!("Invalid {} name: {:?}", kind, name);
    }
    Ok(())
}

/// A repository driven through the git CLI.
#[derive(Debug)]
pub struct GitRepository {
    path: PathBuf,
    logger: GitLogger,
}

impl GitRepository {
    /// Returns true when `path` is inside a git work tree.
    pub fn is_valid(path: &Path) -> bool {
        run_git(path, &["rev-parse", "--is-inside-work-tree"])
            .is_ok_and(|output| output == "true")
    }

    pub fn open(path: &Path, logger: GitLogger) -> anyhow::Result<Self> {
        let root = run_git(path, &["rev-parse", "--show-toplevel"])
            .with_context(|| format!("Failed to open repository at {}", path.display()))?;
        Ok(Self {
            path: PathBuf::from(root),
            logger,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn git(&self, args: &[&str]) -> anyhow::Result<String> {
        (self.logger)(args);
        run_git(&self.path, args)
    }

    fn git_output(&self, args: &[&str]) -> anyhow::Result<GitOutput> {
        (self.logger)(args);
        run_git_output(&self.path, args)
    }

    fn branch_exists(&self, branch: &str) -> anyhow::Result<bool> {
        let reference = format!("{HEADS_PREFIX}{branch}");
        let output = self.git_output(&["show-ref", "--verify", "--quiet", &reference])?;
        Ok(output.success)
    }

    fn has_remote(&self, remote: &str) -> anyhow::Result<bool> {
        let output = self.git(&["remote"]).context("Failed to list remotes")?;
        Ok(output.lines().any(|line| line.trim() == remote))
    }

    fn list_refs(&self, prefix: &str) -> anyhow::Result<Vec<String>> {
        let output = self.git(&["for-each-ref", "--format=%(refname)", prefix])?;
        Ok(output.lines().map(str::to_string).collect())
    }

    fn advertised_branches(&self, remote: &str) -> anyhow::Result<HashSet<String>> {
        let output = self
            .git(&["ls-remote", "--heads", remote])
            .with_context(|| format!("Failed to query remote '{remote}'"))?;
        Ok(output
            .lines()
            .filter_map(|line| line.split_whitespace().nth(1))
            .map(|reference| short_branch_name(reference, remote).to_string())
            .collect())
    }

    fn tracked_branches(&self, remote: &str) -> anyhow::Result<HashSet<String>> {
        let prefix = format!("{REMOTES_PREFIX}{remote}/");
        let refs = self
            .list_refs(&prefix)
            .with_context(|| format!("Failed to read remote-tracking refs of '{remote}'"))?;
        Ok(refs
            .iter()
            .map(|reference| short_branch_name(reference, remote))
            .filter(|name| *name != REMOTE_HEAD)
            .map(str::to_string)
            .collect())
    }
}

impl Repository for GitRepository {
    fn checkout(&mut self, branch: &str) -> Result<(), CheckoutError> {
        let failed = |cause: anyhow::Error| CheckoutError::Failed {
            branch: branch.to_string(),
            cause,
        };
        validate_name("branch", branch).map_err(failed)?;
        if !self.branch_exists(branch).map_err(failed)? {
            return Err(CheckoutError::NotFound {
                branch: branch.to_string(),
            });
        }
        self.git(&["checkout", branch]).map_err(failed)?;
        Ok(())
    }

    fn fetch_prune(&mut self, remote: &str) -> anyhow::Result<FetchOutcome> {
        validate_name("remote", remote)?;
        let output = self.git_output(&["fetch", "--prune", remote])?;
        if !output.success {
            anyhow::bail!("failed to fetch from remote {}: {}", remote, output.stderr);
        }
        // git reports ref updates on stderr and stays silent when nothing changed.
        if output.stderr.is_empty() {
            Ok(FetchOutcome::AlreadyUpToDate)
        } else {
            Ok(FetchOutcome::Updated)
        }
    }

    fn local_branches(&self) -> anyhow::Result<Vec<String>> {
        let refs = self
            .list_refs(HEADS_PREFIX)
            .context("Failed to list local branches")?;
        Ok(refs
            .iter()
            .filter_map(|reference| reference.strip_prefix(HEADS_PREFIX))
            .map(str::to_string)
            .collect())
    }

    fn remote_branches(&self, remote: &str) -> Result<HashSet<String>, RemoteError> {
        let query = |cause: anyhow::Error| RemoteError::Query {
            remote: remote.to_string(),
            cause,
        };
        validate_name("remote", remote).map_err(query)?;
        if !self.has_remote(remote).map_err(query)? {
            return Err(RemoteError::NotConfigured {
                remote: remote.to_string(),
            });
        }
        match self.advertised_branches(remote) {
            Ok(branches) => Ok(branches),
            // Unreachable remote: fall back to what the last fetch recorded.
            Err(_) => self.tracked_branches(remote).map_err(query),
        }
    }

    fn current_branch(&self) -> anyhow::Result<String> {
        self.git(&["rev-parse", "--abbrev-ref", "HEAD"])
            .context("Failed to get current branch")
    }

    fn delete_branch(&mut self, branch: &str) -> anyhow::Result<()> {
        validate_name("branch", branch)?;
        self.git(&["branch", "-d", branch])
            .with_context(|| format!("Failed to delete branch '{branch}'"))?;
        Ok(())
    }
}
