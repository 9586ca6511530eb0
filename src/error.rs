//! Fatal workflow errors.

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum MaintenanceError {
    #[error("not a Git repository: {}", .path.display())]
    NotARepository { path: PathBuf },

    #[error("failed to open repository: {cause:#}")]
    Open { cause: anyhow::Error },

    #[error("no primary branch found (tried 'main' and 'master')")]
    NoPrimaryBranch,

    #[error("failed to checkout primary branch '{branch}': {cause:#}")]
    Checkout { branch: String, cause: anyhow::Error },

    #[error("remote '{remote}' not found; cannot identify stale branches")]
    RemoteNotConfigured { remote: String },

    #[error("failed to identify stale branches: {cause:#}")]
    Repository { cause: anyhow::Error },

    #[error(
        "refusing to delete {count} branch(es) without --force; use --force to delete them, or --dry-run to preview"
    )]
    RefusedWithoutForce { count: usize },

    #[error("failed to delete branch '{branch}' ({} already deleted): {cause:#}", .deleted.len())]
    DeletionFailed {
        branch: String,
        deleted: Vec<String>,
        cause: anyhow::Error,
    },
}
