//! ELF container parser for RISC-V binaries.
//!
//! Loads an image into memory, validates the container, and exposes the
//! section table plus borrowed per-section byte views. Nothing here
//! interprets instruction bytes; that is the consumer's job.

mod constants;
mod file;
mod header;

pub use constants::*;
pub use file::*;
pub use header::*;

use thiserror::Error;

/// ELF parsing errors.
#[derive(Error, Debug)]
pub enum ElfError {
    #[error("ELF data too small")]
    TooSmall,
    #[error("Invalid ELF magic number")]
    InvalidMagic,
    #[error("Only little-endian ELF supported")]
    NotLittleEndian,
    #[error("Unsupported ELF class: {0}")]
    UnsupportedClass(u8),
    #[error("Not a RISC-V binary (e_machine {0})")]
    NotRiscv(u16),
    #[error("No section headers found")]
    NoSections,
    #[error("Section header out of bounds")]
    SectionOutOfBounds,
    #[error("Section data out of bounds: {name}")]
    SectionDataOutOfBounds { name: String },
}

pub type Result<T> = std::result::Result<T, ElfError>;
