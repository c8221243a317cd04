//! ELF header structures.

use crate::constants::{SHF_EXECINSTR, SHT_PROGBITS};

/// ELF header.
///
/// Wide fields are stored as `u64` regardless of class; the class byte
/// records which on-disk layout they were read from.
#[derive(Clone, Debug)]
pub struct ElfHeader {
    pub magic: u32,
    pub class: u8,
    pub data: u8,
    pub version: u8,
    pub abi: u8,
    pub abi_version: u8,
    pub machine: u16,
    pub entry: u64,
    pub shoff: u64,
    pub flags: u32,
    pub shentsize: u16,
    pub shnum: u16,
    pub shstrndx: u16,
}

/// One section-table entry with its name resolved.
#[derive(Clone, Debug)]
pub struct Section {
    pub name: String,
    pub sh_type: u32,
    pub flags: u64,
    pub addr: u64,
    pub offset: u64,
    pub size: u64,
}

impl Section {
    /// Whether the type field carries the program-defined-content bit.
    #[must_use]
    pub const fn is_progbits(&self) -> bool {
        (self.sh_type & SHT_PROGBITS) != 0
    }

    /// Whether the section is flagged as holding executable instructions.
    #[must_use]
    pub const fn is_executable(&self) -> bool {
        (self.flags & SHF_EXECINSTR) != 0
    }
}

/// Borrowed view of one section's file bytes.
///
/// Never owns the bytes; lives no longer than the image it was cut from.
#[derive(Clone, Copy, Debug)]
pub struct SectionView<'a> {
    pub name: &'a str,
    pub addr: u64,
    pub data: &'a [u8],
}
