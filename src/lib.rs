//! Git repository maintenance library.
//!
//! This crate keeps a local repository tidy by:
//! - Checking out main/master
//! - Fetching from the remote with prune
//! - Finding local branches whose remote counterpart is gone
//! - Deleting them, only when explicitly forced

pub mod app;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod git;
pub mod maintenance;
pub mod output;
pub mod repository;
pub mod stale;
