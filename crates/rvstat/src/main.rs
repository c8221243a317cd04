//! rvstat CLI - RISC-V instruction census

mod cli;
mod commands;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::Cli;

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = cli::parse_error_code(&e);
            let _ = e.print();
            std::process::exit(code);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("rvstat=info".parse().unwrap()),
        )
        .with_target(false)
        .init();

    std::process::exit(commands::run_command(&cli));
}
