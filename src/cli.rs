//! Command-line surface.

use crate::config::{Config, Verbosity};
use crate::constants::DEFAULT_REMOTE;
use crate::maintenance::MaintenanceOptions;
use clap::Parser;
use std::io::IsTerminal;

#[derive(Debug, Parser)]
#[command(
    name = "git-tidy",
    version,
    about = "Clean up your Git repository",
    long_about = "Performs routine Git repository maintenance:\n\n\
        1. Checkout the main (or master) branch\n\
        2. Fetch from the remote with pruning\n\
        3. Remove local branches that no longer exist on the remote\n\n\
        Branches are only deleted with --force; use --dry-run to preview."
)]
pub struct Cli {
    /// Show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Remote name to use
    #[arg(long, default_value = DEFAULT_REMOTE)]
    pub remote: String,

    /// Actually delete stale branches
    #[arg(long)]
    pub force: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    #[must_use]
    pub fn config(&self) -> Config {
        Config {
            verbosity: if self.verbose {
                Verbosity::Verbose
            } else {
                Verbosity::Normal
            },
            color: !self.no_color && std::io::stdout().is_terminal(),
        }
    }

    #[must_use]
    pub fn options(&self) -> MaintenanceOptions {
        MaintenanceOptions {
            remote: self.remote.clone(),
            dry_run: self.dry_run,
            force: self.force,
        }
    }
}
