//! Command implementation.

use rvstat::{ScanOptions, run_census, write_report};
use tracing::{debug, error, info};

use crate::cli::{Cli, EXIT_FAILURE, EXIT_SUCCESS};

/// Run the census and write the report. Returns the process exit code.
pub fn run_command(cli: &Cli) -> i32 {
    match execute(cli) {
        Ok(()) => EXIT_SUCCESS,
        Err(e) => {
            error!(error = %e, "census failed");
            EXIT_FAILURE
        }
    }
}

fn execute(cli: &Cli) -> rvstat::Result<()> {
    if cli.ascending {
        debug!("sort order is applied by the viewer; the report stays in table order");
    }

    let mut census = run_census(&cli.input, &ScanOptions::default())?;
    census.highlight = cli.highlight_groups.clone();

    write_report(&cli.output, &census)?;
    info!(output = %cli.output.display(), "report written");

    Ok(())
}
