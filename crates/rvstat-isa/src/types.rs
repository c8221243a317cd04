//! Core ISA types shared across the workspace.

/// Register width (XLEN) of the target image.
///
/// Selected from the ELF class at load time. A handful of encodings decode
/// differently per width (for example `c.jal` on RV32 occupies the same
/// encoding as `c.addiw` on RV64), so the decoder takes the width as input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Xlen {
    /// 32-bit RISC-V.
    Rv32,
    /// 64-bit RISC-V.
    Rv64,
}

impl Xlen {
    /// Width in bits (32 or 64).
    #[must_use]
    pub const fn bits(self) -> u8 {
        match self {
            Self::Rv32 => 32,
            Self::Rv64 => 64,
        }
    }
}

/// Byte width of one instruction encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstrWidth {
    /// 16-bit compressed encoding.
    Half,
    /// Full 32-bit encoding.
    Word,
}

impl InstrWidth {
    /// Number of bytes this width consumes in the instruction stream.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::Half => 2,
            Self::Word => 4,
        }
    }
}
