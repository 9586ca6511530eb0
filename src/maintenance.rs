//! The maintenance workflow: checkout the primary branch, fetch with prune,
//! identify stale branches and delete them when explicitly allowed.
//!
//! The workflow is modelled as an explicit [`WorkflowState`] machine so every
//! transition can be driven and inspected on its own. Steps one and three are
//! fatal on error, step two only ever warns, step four is fatal but keeps the
//! deletions that already happened.

use crate::constants::{DEFAULT_REMOTE, PRIMARY_BRANCHES};
use crate::error::MaintenanceError;
use crate::repository::{CheckoutError, FetchOutcome, RemoteError, Repository};
use crate::stale::find_stale_branches;
use std::fmt;

/// Options controlling the destructive part of the workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceOptions {
    /// Remote used for fetching and for the staleness comparison.
    pub remote: String,
    /// Report stale branches without deleting them.
    pub dry_run: bool,
    /// Required to actually delete stale branches.
    pub force: bool,
}

impl Default for MaintenanceOptions {
    fn default() -> Self {
        Self {
            remote: DEFAULT_REMOTE.to_string(),
            dry_run: false,
            force: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintenanceStep {
    CheckingOut,
    Fetching { remote: String },
    IdentifyingStale,
    Deleting { count: usize },
}

impl fmt::Display for MaintenanceStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CheckingOut => write!(f, "Checking out main branch"),
            Self::Fetching { remote } => {
                write!(f, "Fetching from remote '{remote}' with pruning")
            }
            Self::IdentifyingStale => write!(f, "Identifying stale local branches"),
            Self::Deleting { .. } => write!(f, "Deleting stale branches"),
        }
    }
}

/// How the fetch step ended. Failures are kept as a reason, never fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchStatus {
    Updated,
    AlreadyUpToDate,
    Skipped { reason: String },
}

impl From<FetchOutcome> for FetchStatus {
    fn from(outcome: FetchOutcome) -> Self {
        match outcome {
            FetchOutcome::Updated => Self::Updated,
            FetchOutcome::AlreadyUpToDate => Self::AlreadyUpToDate,
        }
    }
}

/// Successful terminal states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MaintenanceOutcome {
    NoStaleBranches,
    DryRun { stale: Vec<String> },
    Deleted { branches: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceReport {
    pub primary_branch: &'static str,
    pub fetch: FetchStatus,
    pub outcome: MaintenanceOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowState {
    Init,
    CheckedOut {
        primary: &'static str,
    },
    Fetched {
        primary: &'static str,
        fetch: FetchStatus,
    },
    StaleIdentified {
        primary: &'static str,
        fetch: FetchStatus,
        stale: Vec<String>,
    },
    Finished(MaintenanceReport),
}

/// Progress notifications emitted while the workflow runs.
pub trait MaintenanceCallbacks {
    fn on_step(&self, _step: &MaintenanceStep) {}
    fn on_checked_out(&self, _branch: &str) {}
    fn on_fetched(&self, _remote: &str, _outcome: FetchOutcome) {}
    fn on_fetch_skipped(&self, _remote: &str, _error: &anyhow::Error) {}
    /// Called with the full stale list before anything is deleted.
    fn on_stale_branches(&self, _branches: &[String]) {}
    fn on_branch_deleted(&self, _branch: &str) {}
}

pub struct Maintenance<'a, R: Repository, C: MaintenanceCallbacks> {
    repo: &'a mut R,
    callbacks: &'a C,
    options: &'a MaintenanceOptions,
}

impl<'a, R: Repository, C: MaintenanceCallbacks> Maintenance<'a, R, C> {
    pub fn new(repo: &'a mut R, callbacks: &'a C, options: &'a MaintenanceOptions) -> Self {
        Self {
            repo,
            callbacks,
            options,
        }
    }

    /// Drives the state machine from [`WorkflowState::Init`] to a terminal state.
    pub fn run(&mut self) -> Result<MaintenanceReport, MaintenanceError> {
        let mut state = WorkflowState::Init;
        loop {
            state = match self.advance(state)? {
                WorkflowState::Finished(report) => return Ok(report),
                next => next,
            };
        }
    }

    /// Performs the single transition out of `state`.
    pub fn advance(&mut self, state: WorkflowState) -> Result<WorkflowState, MaintenanceError> {
        match state {
            WorkflowState::Init => {
                let primary = self.checkout_primary()?;
                Ok(WorkflowState::CheckedOut { primary })
            }
            WorkflowState::CheckedOut { primary } => Ok(WorkflowState::Fetched {
                primary,
                fetch: self.fetch(),
            }),
            WorkflowState::Fetched { primary, fetch } => {
                let stale = self.identify_stale()?;
                if stale.is_empty() {
                    return Ok(WorkflowState::Finished(MaintenanceReport {
                        primary_branch: primary,
                        fetch,
                        outcome: MaintenanceOutcome::NoStaleBranches,
                    }));
                }
                Ok(WorkflowState::StaleIdentified {
                    primary,
                    fetch,
                    stale,
                })
            }
            WorkflowState::StaleIdentified {
                primary,
                fetch,
                stale,
            } => {
                let outcome = self.delete_stale(stale)?;
                Ok(WorkflowState::Finished(MaintenanceReport {
                    primary_branch: primary,
                    fetch,
                    outcome,
                }))
            }
            finished @ WorkflowState::Finished(_) => Ok(finished),
        }
    }

    fn checkout_primary(&mut self) -> Result<&'static str, MaintenanceError> {
        self.callbacks.on_step(&MaintenanceStep::CheckingOut);
        for branch in PRIMARY_BRANCHES {
            match self.repo.checkout(branch) {
                Ok(()) => {
                    self.callbacks.on_checked_out(branch);
                    return Ok(branch);
                }
                Err(CheckoutError::NotFound { .. }) => continue,
                Err(CheckoutError::Failed { branch, cause }) => {
                    return Err(MaintenanceError::Checkout { branch, cause });
                }
            }
        }
        Err(MaintenanceError::NoPrimaryBranch)
    }

    fn fetch(&mut self) -> FetchStatus {
        let remote = self.options.remote.as_str();
        self.callbacks.on_step(&MaintenanceStep::Fetching {
            remote: remote.to_string(),
        });
        match self.repo.fetch_prune(remote) {
            Ok(outcome) => {
                self.callbacks.on_fetched(remote, outcome);
                outcome.into()
            }
            Err(error) => {
                self.callbacks.on_fetch_skipped(remote, &error);
                FetchStatus::Skipped {
                    reason: format!("{error:#}"),
                }
            }
        }
    }

    fn identify_stale(&mut self) -> Result<Vec<String>, MaintenanceError> {
        self.callbacks.on_step(&MaintenanceStep::IdentifyingStale);
        let remote = self.options.remote.as_str();

        let remote_branches = self.repo.remote_branches(remote).map_err(|e| match e {
            RemoteError::NotConfigured { remote } => {
                MaintenanceError::RemoteNotConfigured { remote }
            }
            query @ RemoteError::Query { .. } => MaintenanceError::Repository {
                cause: query.into(),
            },
        })?;
        let local = self
            .repo
            .local_branches()
            .map_err(|cause| MaintenanceError::Repository { cause })?;
        let current = self
            .repo
            .current_branch()
            .map_err(|cause| MaintenanceError::Repository { cause })?;

        Ok(find_stale_branches(&local, &remote_branches, &current))
    }

    fn delete_stale(&mut self, stale: Vec<String>) -> Result<MaintenanceOutcome, MaintenanceError> {
        self.callbacks.on_stale_branches(&stale);

        if self.options.dry_run {
            return Ok(MaintenanceOutcome::DryRun { stale });
        }
        if !self.options.force {
            return Err(MaintenanceError::RefusedWithoutForce { count: stale.len() });
        }

        self.callbacks
            .on_step(&MaintenanceStep::Deleting { count: stale.len() });
        let mut deleted = Vec::with_capacity(stale.len());
        for branch in stale {
            if let Err(cause) = self.repo.delete_branch(&branch) {
                return Err(MaintenanceError::DeletionFailed {
                    branch,
                    deleted,
                    cause,
                });
            }
            self.callbacks.on_branch_deleted(&branch);
            deleted.push(branch);
        }
        Ok(MaintenanceOutcome::Deleted { branches: deleted })
    }
}
