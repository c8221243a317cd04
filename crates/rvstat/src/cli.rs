//! CLI definitions and argument types.

use std::path::PathBuf;

use clap::Parser;
use clap::error::ErrorKind;

/// Exit code for success.
pub const EXIT_SUCCESS: i32 = 0;
/// Exit code for failure.
pub const EXIT_FAILURE: i32 = 1;

/// Output path used when `-o` is not given.
pub const DEFAULT_OUTPUT: &str = "build/rvstat/histogram.json";

#[derive(Parser, Debug)]
#[command(name = "rvstat")]
#[command(about = "RISC-V instruction census - mnemonic histogram over ELF executable sections")]
#[command(version)]
pub struct Cli {
    /// Input ELF file
    #[arg(short, long, value_name = "ELF")]
    pub input: PathBuf,

    /// Output JSON report path
    #[arg(short, long, value_name = "PATH", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Highlight-group annotation, passed through to the report verbatim
    #[arg(short = 'l', long, value_name = "GROUPS")]
    pub highlight_groups: Option<String>,

    /// Ascending frequency order in the viewer (the report itself stays
    /// in table order)
    #[arg(short, long)]
    pub ascending: bool,
}

/// Map an argument-parse failure to the process exit code.
///
/// Help and version requests are not usage errors; everything else exits
/// with failure.
#[must_use]
pub fn parse_error_code(err: &clap::Error) -> i32 {
    match err.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => EXIT_SUCCESS,
        _ => EXIT_FAILURE,
    }
}
