//! Entry point logic shared by the binary and the tests.

use crate::cli::Cli;
use crate::error::MaintenanceError;
use crate::git::GitRepository;
use crate::maintenance::{Maintenance, MaintenanceReport};
use crate::output::{self, ConsoleCallbacks};
use std::path::Path;

/// Runs the maintenance workflow on the repository at `cwd`.
pub fn run(cli: &Cli, cwd: &Path) -> Result<MaintenanceReport, MaintenanceError> {
    let config = cli.config();
    let printer = config.printer();

    if !GitRepository::is_valid(cwd) {
        return Err(MaintenanceError::NotARepository {
            path: cwd.to_path_buf(),
        });
    }

    printer.info(format_args!("Starting Git maintenance in: {}", cwd.display()));

    let mut repo = GitRepository::open(cwd, config.git_logger())
        .map_err(|cause| MaintenanceError::Open { cause })?;
    let options = cli.options();
    let callbacks = ConsoleCallbacks::new(config);

    let report = Maintenance::new(&mut repo, &callbacks, &options).run()?;
    output::print_report(&printer, &report);
    Ok(report)
}
