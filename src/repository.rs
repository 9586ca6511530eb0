//! The narrow capability interface the maintenance workflow consumes.
//!
//! The git CLI backend lives in [`crate::git`]; tests drive the workflow
//! through an in-memory implementation instead.

use std::collections::HashSet;

/// Result of a successful fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// References were updated or pruned.
    Updated,
    /// The remote had nothing new.
    AlreadyUpToDate,
}

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error("branch '{branch}' not found")]
    NotFound { branch: String },
    #[error("failed to checkout branch '{branch}': {cause:#}")]
    Failed { branch: String, cause: anyhow::Error },
}

#[derive(Debug, thiserror::Error)]
pub enum RemoteError {
    #[error("remote '{remote}' not found")]
    NotConfigured { remote: String },
    #[error("failed to list branches of remote '{remote}': {cause:#}")]
    Query { remote: String, cause: anyhow::Error },
}

/// Operations on a single opened repository.
///
/// Implementations assume exclusive access for the lifetime of the handle;
/// every call blocks until the underlying engine returns.
pub trait Repository {
    fn checkout(&mut self, branch: &str) -> Result<(), CheckoutError>;

    /// Fetches every branch of `remote`, pruning remote-tracking refs that
    /// disappeared upstream.
    fn fetch_prune(&mut self, remote: &str) -> anyhow::Result<FetchOutcome>;

    /// Local branch names in enumeration order.
    fn local_branches(&self) -> anyhow::Result<Vec<String>>;

    /// Short branch names advertised by `remote`.
    fn remote_branches(&self, remote: &str) -> Result<HashSet<String>, RemoteError>;

    fn current_branch(&self) -> anyhow::Result<String>;

    fn delete_branch(&mut self, branch: &str) -> anyhow::Result<()>;
}
