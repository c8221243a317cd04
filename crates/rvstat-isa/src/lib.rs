//! RISC-V instruction set definitions and identity decoder.
//!
//! This crate provides the closed instruction taxonomy used by the census
//! and a pure decoder from raw words to taxonomy entries. Decoding is
//! identity-only: a word maps to one [`Opcode`] or to `None` when the
//! encoding is not a recognized instruction. Coverage is RV32/RV64 I, M, A,
//! C, Zicsr, and Zifencei.

mod decode;
mod opcodes;
mod types;

pub use decode::decode;
pub use opcodes::{MASK_RD, MASK_RS1, MASK_RS2, MASK_RS3, Opcode};
pub use types::{InstrWidth, Xlen};
