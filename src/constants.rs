//! Application-wide constants.
//!
//! Centralized values to avoid magic strings throughout the codebase.

/// Primary branch names, in checkout order.
pub const MAIN_BRANCH: &str = "main";
pub const MASTER_BRANCH: &str = "master";
pub const PRIMARY_BRANCHES: [&str; 2] = [MAIN_BRANCH, MASTER_BRANCH];

/// Remote used for fetching and staleness comparison unless `--remote` is given.
pub const DEFAULT_REMOTE: &str = "origin";

/// Prefix of local branch references.
pub const HEADS_PREFIX: &str = "refs/heads/";

/// Prefix of remote-tracking references.
pub const REMOTES_PREFIX: &str = "refs/remotes/";

/// Symbolic remote-tracking ref that never names a real branch.
pub const REMOTE_HEAD: &str = "HEAD";

/// Spinner tick interval in milliseconds.
pub const PROGRESS_TICK_MS: u64 = 80;
