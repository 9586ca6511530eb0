//! Status lines, colored output and the fetch spinner.
//!
//! Color is a value handed to [`Printer`] at startup; nothing here touches
//! process-wide color state.

use crate::config::Config;
use crate::constants::PROGRESS_TICK_MS;
use crate::maintenance::{
    MaintenanceCallbacks, MaintenanceOutcome, MaintenanceReport, MaintenanceStep,
};
use crate::repository::FetchOutcome;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::cell::RefCell;
use std::fmt::Display;
use std::time::Duration;

/// No-op callbacks for when progress output is not needed.
/// This is the null object pattern for MaintenanceCallbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoOpCallbacks;

impl MaintenanceCallbacks for NoOpCallbacks {}

/// Severity of a status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Warning,
    Error,
}

impl Level {
    fn symbol(self) -> &'static str {
        match self {
            Level::Success => "✓",
            Level::Info => "ℹ",
            Level::Warning => "⚠",
            Level::Error => "✗",
        }
    }
}

/// Renders severity-tagged status lines.
#[derive(Debug, Clone, Copy)]
pub struct Printer {
    color: bool,
}

impl Printer {
    #[must_use]
    pub fn new(color: bool) -> Self {
        Self { color }
    }

    #[must_use]
    pub fn color_enabled(&self) -> bool {
        self.color
    }

    #[must_use]
    pub fn render(&self, level: Level, message: impl Display) -> String {
        let line = format!("{} {}", level.symbol(), message);
        if !self.color {
            return line;
        }
        match level {
            Level::Success => line.green().bold().to_string(),
            Level::Info => line.blue().to_string(),
            Level::Warning => line.yellow().to_string(),
            Level::Error => line.red().bold().to_string(),
        }
    }

    pub fn success(&self, message: impl Display) {
        println!("{}", self.render(Level::Success, message));
    }

    pub fn info(&self, message: impl Display) {
        println!("{}", self.render(Level::Info, message));
    }

    pub fn warning(&self, message: impl Display) {
        println!("{}", self.render(Level::Warning, message));
    }

    pub fn error(&self, message: impl Display) {
        eprintln!("{}", self.render(Level::Error, message));
    }

    /// Prints an indented list entry.
    pub fn item(&self, message: impl Display) {
        println!("  - {message}");
    }

    /// Prints an indented narration line, dimmed when color is on.
    pub fn detail(&self, message: impl Display) {
        let line = message.to_string();
        if self.color {
            println!("  {}", line.dimmed());
        } else {
            println!("  {line}");
        }
    }
}

/// Console reporting for a maintenance run.
pub struct ConsoleCallbacks {
    printer: Printer,
    config: Config,
    spinner: RefCell<Option<ProgressBar>>,
}

impl ConsoleCallbacks {
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            printer: config.printer(),
            config,
            spinner: RefCell::new(None),
        }
    }

    fn narrate(&self, message: impl Display) {
        if self.config.is_verbose() {
            self.printer.detail(message);
        }
    }

    fn start_spinner(&self, message: String) {
        if self.config.is_verbose() {
            return;
        }
        *self.spinner.borrow_mut() = Some(create_spinner(message));
    }

    fn stop_spinner(&self) {
        if let Some(spinner) = self.spinner.borrow_mut().take() {
            spinner.finish_and_clear();
        }
    }
}

impl MaintenanceCallbacks for ConsoleCallbacks {
    fn on_step(&self, step: &MaintenanceStep) {
        self.printer.info(format_args!("{step}..."));
        match step {
            MaintenanceStep::CheckingOut => {
                self.narrate("Looking for main or master branch...");
            }
            MaintenanceStep::Fetching { remote } => {
                self.narrate("This will update local remote-tracking branches...");
                self.start_spinner(format!("Fetching from {remote}..."));
            }
            MaintenanceStep::IdentifyingStale => {
                self.narrate("Comparing local branches with remote branches...");
            }
            MaintenanceStep::Deleting { count } => {
                self.narrate(format_args!("Deleting {count} branch(es)..."));
            }
        }
    }

    fn on_checked_out(&self, branch: &str) {
        self.printer
            .success(format_args!("Checked out {branch} branch"));
    }

    fn on_fetched(&self, _remote: &str, outcome: FetchOutcome) {
        self.stop_spinner();
        match outcome {
            FetchOutcome::Updated => self.printer.success("Fetched and pruned remote branches"),
            FetchOutcome::AlreadyUpToDate => {
                self.printer.success("Remote branches already up to date")
            }
        }
    }

    fn on_fetch_skipped(&self, _remote: &str, error: &anyhow::Error) {
        self.stop_spinner();
        self.printer
            .warning(format_args!("Skipping fetch/prune: {error:#}"));
        self.narrate("Remote unavailable, proceeding with local cleanup only...");
    }

    fn on_stale_branches(&self, branches: &[String]) {
        self.printer.warning(format_args!(
            "Found {} stale local branch(es):",
            branches.len()
        ));
        for branch in branches {
            self.printer.item(branch);
        }
    }

    fn on_branch_deleted(&self, branch: &str) {
        self.narrate(format_args!("Deleted {branch}"));
    }
}

fn create_spinner(message: String) -> ProgressBar {
    let style = ProgressStyle::default_spinner()
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
        .template("{spinner:.cyan} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(style);
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(PROGRESS_TICK_MS));
    spinner
}

/// Prints the closing lines for a successful run.
pub fn print_report(printer: &Printer, report: &MaintenanceReport) {
    match &report.outcome {
        MaintenanceOutcome::NoStaleBranches => {
            printer.success("No stale branches found");
            return;
        }
        MaintenanceOutcome::DryRun { stale } => {
            printer.info(format_args!("Dry run: would delete {} branch(es)", stale.len()));
        }
        MaintenanceOutcome::Deleted { branches } => {
            printer.success(format_args!(
                "Deleted {} stale branch(es)",
                branches.len()
            ));
        }
    }
    printer.success("Git maintenance completed successfully!");
}
