//! rvstat - RISC-V instruction census.
//!
//! Scans the executable sections of a RISC-V ELF binary, walks the mixed
//! 16/32-bit instruction stream, and accumulates a frequency histogram
//! over mnemonics, serialized as JSON for downstream visualization.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use rvstat::{ScanOptions, run_census};
//!
//! let census = run_census(Path::new("program.elf"), &ScanOptions::default())?;
//! println!("{} units counted", census.histogram.total());
//! ```

// Re-export from sub-crates
pub use rvstat_elf::{ElfError, ElfImage, Section, SectionView};
pub use rvstat_isa::{InstrWidth, Opcode, Xlen, decode};

mod histogram;
mod report;
mod scan;

pub use histogram::{Entry, Histogram, InstructionUnit};
pub use report::{Census, render, write_report};
pub use scan::{InsnWindows, ScanOptions, classify, executable_sections, scan_image};

use std::path::Path;

use thiserror::Error;
use tracing::info;

/// Census errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("ELF error: {0}")]
    Elf(#[from] rvstat_elf::ElfError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Load the ELF image at `path` and run the census over it.
///
/// The returned census carries no highlight annotation; callers set one
/// before handing it to the report writer.
pub fn run_census(path: &Path, options: &ScanOptions) -> Result<Census> {
    let data = std::fs::read(path)?;
    let image = ElfImage::parse(data)?;
    info!(
        path = %path.display(),
        sections = image.sections().len(),
        xlen = ?image.xlen(),
        "image loaded"
    );

    let histogram = scan_image(&image, options)?;
    info!(units = histogram.total(), "census complete");

    Ok(Census {
        histogram,
        highlight: None,
    })
}
