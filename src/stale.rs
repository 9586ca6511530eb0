//! Stale branch detection.

use crate::constants::{HEADS_PREFIX, REMOTES_PREFIX};
use std::collections::HashSet;

/// Reduces a branch reference to the short name used for comparison.
///
/// `refs/heads/x`, `refs/remotes/<remote>/x` and `<remote>/x` all become `x`.
/// Anything else is returned untouched.
pub fn short_branch_name<'a>(reference: &'a str, remote: &str) -> &'a str {
    if let Some(name) = reference.strip_prefix(HEADS_PREFIX) {
        return name;
    }
    let tracking = reference
        .strip_prefix(REMOTES_PREFIX)
        .unwrap_or(reference);
    tracking
        .strip_prefix(remote)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or(reference)
}

/// Returns the local branches missing from `remote`, excluding `current`.
///
/// Order follows `local`. Names are compared byte for byte.
#[must_use]
pub fn find_stale_branches(
    local: &[String],
    remote: &HashSet<String>,
    current: &str,
) -> Vec<String> {
    local
        .iter()
        .filter(|branch| branch.as_str() != current && !remote.contains(branch.as_str()))
        .cloned()
        .collect()
}
