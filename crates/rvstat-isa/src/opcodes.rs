//! The closed instruction taxonomy.
//!
//! One declarative table drives the [`Opcode`] enum, its label, and its
//! operand-usage metadata, so the three can never drift apart. Entry order
//! here is the histogram table order and is part of the output contract.

/// First source register slot.
pub const MASK_RS1: u8 = 0x1;
/// Second source register slot.
pub const MASK_RS2: u8 = 0x2;
/// Third source register slot (fused shapes; unused by the extensions
/// currently in the taxonomy).
pub const MASK_RS3: u8 = 0x4;
/// Destination register slot.
pub const MASK_RD: u8 = 0x8;

macro_rules! opcode_table {
    ($($variant:ident => $mnemonic:literal, $mask:expr;)+) => {
        /// Closed set of instruction identities counted by the census.
        ///
        /// Variant order is the fixed table order; [`Opcode::Unknown`] is a
        /// first-class member and always last. Discriminants are table
        /// positions, so an opcode indexes its histogram slot directly.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Opcode {
            $($variant,)+
        }

        impl Opcode {
            /// Every opcode in table order.
            pub const ALL: &'static [Self] = &[$(Self::$variant,)+];

            /// Table size, the `Unknown` bucket included.
            pub const COUNT: usize = Self::ALL.len();

            /// Lower-case mnemonic label, as emitted in the report.
            #[must_use]
            pub const fn mnemonic(self) -> &'static str {
                match self {
                    $(Self::$variant => $mnemonic,)+
                }
            }

            /// Operand-slot usage as `MASK_*` bits. Informational metadata
            /// fixed at table construction, never consulted by the decoder.
            #[must_use]
            pub const fn operand_mask(self) -> u8 {
                match self {
                    $(Self::$variant => $mask,)+
                }
            }
        }
    };
}

opcode_table! {
    // RV32I base
    Lui => "lui", MASK_RD;
    Auipc => "auipc", MASK_RD;
    Jal => "jal", MASK_RD;
    Jalr => "jalr", MASK_RD | MASK_RS1;
    Beq => "beq", MASK_RS1 | MASK_RS2;
    Bne => "bne", MASK_RS1 | MASK_RS2;
    Blt => "blt", MASK_RS1 | MASK_RS2;
    Bge => "bge", MASK_RS1 | MASK_RS2;
    Bltu => "bltu", MASK_RS1 | MASK_RS2;
    Bgeu => "bgeu", MASK_RS1 | MASK_RS2;
    Lb => "lb", MASK_RD | MASK_RS1;
    Lh => "lh", MASK_RD | MASK_RS1;
    Lw => "lw", MASK_RD | MASK_RS1;
    Lbu => "lbu", MASK_RD | MASK_RS1;
    Lhu => "lhu", MASK_RD | MASK_RS1;
    Sb => "sb", MASK_RS1 | MASK_RS2;
    Sh => "sh", MASK_RS1 | MASK_RS2;
    Sw => "sw", MASK_RS1 | MASK_RS2;
    Addi => "addi", MASK_RD | MASK_RS1;
    Slti => "slti", MASK_RD | MASK_RS1;
    Sltiu => "sltiu", MASK_RD | MASK_RS1;
    Xori => "xori", MASK_RD | MASK_RS1;
    Ori => "ori", MASK_RD | MASK_RS1;
    Andi => "andi", MASK_RD | MASK_RS1;
    Slli => "slli", MASK_RD | MASK_RS1;
    Srli => "srli", MASK_RD | MASK_RS1;
    Srai => "srai", MASK_RD | MASK_RS1;
    Add => "add", MASK_RD | MASK_RS1 | MASK_RS2;
    Sub => "sub", MASK_RD | MASK_RS1 | MASK_RS2;
    Sll => "sll", MASK_RD | MASK_RS1 | MASK_RS2;
    Slt => "slt", MASK_RD | MASK_RS1 | MASK_RS2;
    Sltu => "sltu", MASK_RD | MASK_RS1 | MASK_RS2;
    Xor => "xor", MASK_RD | MASK_RS1 | MASK_RS2;
    Srl => "srl", MASK_RD | MASK_RS1 | MASK_RS2;
    Sra => "sra", MASK_RD | MASK_RS1 | MASK_RS2;
    Or => "or", MASK_RD | MASK_RS1 | MASK_RS2;
    And => "and", MASK_RD | MASK_RS1 | MASK_RS2;
    Fence => "fence", 0;
    Ecall => "ecall", 0;
    Ebreak => "ebreak", 0;
    // RV64I additions
    Lwu => "lwu", MASK_RD | MASK_RS1;
    Ld => "ld", MASK_RD | MASK_RS1;
    Sd => "sd", MASK_RS1 | MASK_RS2;
    Addiw => "addiw", MASK_RD | MASK_RS1;
    Slliw => "slliw", MASK_RD | MASK_RS1;
    Srliw => "srliw", MASK_RD | MASK_RS1;
    Sraiw => "sraiw", MASK_RD | MASK_RS1;
    Addw => "addw", MASK_RD | MASK_RS1 | MASK_RS2;
    Subw => "subw", MASK_RD | MASK_RS1 | MASK_RS2;
    Sllw => "sllw", MASK_RD | MASK_RS1 | MASK_RS2;
    Srlw => "srlw", MASK_RD | MASK_RS1 | MASK_RS2;
    Sraw => "sraw", MASK_RD | MASK_RS1 | MASK_RS2;
    // M extension
    Mul => "mul", MASK_RD | MASK_RS1 | MASK_RS2;
    Mulh => "mulh", MASK_RD | MASK_RS1 | MASK_RS2;
    Mulhsu => "mulhsu", MASK_RD | MASK_RS1 | MASK_RS2;
    Mulhu => "mulhu", MASK_RD | MASK_RS1 | MASK_RS2;
    Div => "div", MASK_RD | MASK_RS1 | MASK_RS2;
    Divu => "divu", MASK_RD | MASK_RS1 | MASK_RS2;
    Rem => "rem", MASK_RD | MASK_RS1 | MASK_RS2;
    Remu => "remu", MASK_RD | MASK_RS1 | MASK_RS2;
    Mulw => "mulw", MASK_RD | MASK_RS1 | MASK_RS2;
    Divw => "divw", MASK_RD | MASK_RS1 | MASK_RS2;
    Divuw => "divuw", MASK_RD | MASK_RS1 | MASK_RS2;
    Remw => "remw", MASK_RD | MASK_RS1 | MASK_RS2;
    Remuw => "remuw", MASK_RD | MASK_RS1 | MASK_RS2;
    // A extension
    LrW => "lr.w", MASK_RD | MASK_RS1;
    ScW => "sc.w", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoswapW => "amoswap.w", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoaddW => "amoadd.w", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoxorW => "amoxor.w", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoandW => "amoand.w", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoorW => "amoor.w", MASK_RD | MASK_RS1 | MASK_RS2;
    AmominW => "amomin.w", MASK_RD | MASK_RS1 | MASK_RS2;
    AmomaxW => "amomax.w", MASK_RD | MASK_RS1 | MASK_RS2;
    AmominuW => "amominu.w", MASK_RD | MASK_RS1 | MASK_RS2;
    AmomaxuW => "amomaxu.w", MASK_RD | MASK_RS1 | MASK_RS2;
    LrD => "lr.d", MASK_RD | MASK_RS1;
    ScD => "sc.d", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoswapD => "amoswap.d", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoaddD => "amoadd.d", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoxorD => "amoxor.d", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoandD => "amoand.d", MASK_RD | MASK_RS1 | MASK_RS2;
    AmoorD => "amoor.d", MASK_RD | MASK_RS1 | MASK_RS2;
    AmominD => "amomin.d", MASK_RD | MASK_RS1 | MASK_RS2;
    AmomaxD => "amomax.d", MASK_RD | MASK_RS1 | MASK_RS2;
    AmominuD => "amominu.d", MASK_RD | MASK_RS1 | MASK_RS2;
    AmomaxuD => "amomaxu.d", MASK_RD | MASK_RS1 | MASK_RS2;
    // Zicsr
    Csrrw => "csrrw", MASK_RD | MASK_RS1;
    Csrrs => "csrrs", MASK_RD | MASK_RS1;
    Csrrc => "csrrc", MASK_RD | MASK_RS1;
    Csrrwi => "csrrwi", MASK_RD;
    Csrrsi => "csrrsi", MASK_RD;
    Csrrci => "csrrci", MASK_RD;
    // Zifencei
    FenceI => "fence.i", 0;
    // C extension, quadrant 0
    CAddi4spn => "c.addi4spn", MASK_RD | MASK_RS1;
    CLw => "c.lw", MASK_RD | MASK_RS1;
    CSw => "c.sw", MASK_RS1 | MASK_RS2;
    CLd => "c.ld", MASK_RD | MASK_RS1;
    CSd => "c.sd", MASK_RS1 | MASK_RS2;
    // C extension, quadrant 1
    CNop => "c.nop", 0;
    CAddi => "c.addi", MASK_RD | MASK_RS1;
    CJal => "c.jal", MASK_RD;
    CAddiw => "c.addiw", MASK_RD | MASK_RS1;
    CLi => "c.li", MASK_RD;
    CAddi16sp => "c.addi16sp", MASK_RD | MASK_RS1;
    CLui => "c.lui", MASK_RD;
    CSrli => "c.srli", MASK_RD | MASK_RS1;
    CSrai => "c.srai", MASK_RD | MASK_RS1;
    CAndi => "c.andi", MASK_RD | MASK_RS1;
    CSub => "c.sub", MASK_RD | MASK_RS1 | MASK_RS2;
    CXor => "c.xor", MASK_RD | MASK_RS1 | MASK_RS2;
    COr => "c.or", MASK_RD | MASK_RS1 | MASK_RS2;
    CAnd => "c.and", MASK_RD | MASK_RS1 | MASK_RS2;
    CSubw => "c.subw", MASK_RD | MASK_RS1 | MASK_RS2;
    CAddw => "c.addw", MASK_RD | MASK_RS1 | MASK_RS2;
    CJ => "c.j", 0;
    CBeqz => "c.beqz", MASK_RS1;
    CBnez => "c.bnez", MASK_RS1;
    // C extension, quadrant 2
    CSlli => "c.slli", MASK_RD | MASK_RS1;
    CLwsp => "c.lwsp", MASK_RD | MASK_RS1;
    CLdsp => "c.ldsp", MASK_RD | MASK_RS1;
    CJr => "c.jr", MASK_RS1;
    CMv => "c.mv", MASK_RD | MASK_RS2;
    CEbreak => "c.ebreak", 0;
    CJalr => "c.jalr", MASK_RD | MASK_RS1;
    CAdd => "c.add", MASK_RD | MASK_RS1 | MASK_RS2;
    CSwsp => "c.swsp", MASK_RS1 | MASK_RS2;
    CSdsp => "c.sdsp", MASK_RS1 | MASK_RS2;
    // Catch-all bucket for words that decode to nothing
    Unknown => "unknown", 0;
}

impl Opcode {
    /// Position of this opcode's entry in the histogram table.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_table_ends_with_unknown() {
        assert_eq!(Opcode::ALL.len(), Opcode::COUNT);
        assert_eq!(Opcode::ALL[Opcode::COUNT - 1], Opcode::Unknown);
        assert_eq!(Opcode::Unknown.mnemonic(), "unknown");
    }

    #[test]
    fn test_discriminants_are_table_positions() {
        for (pos, op) in Opcode::ALL.iter().enumerate() {
            assert_eq!(op.index(), pos);
        }
    }

    #[test]
    fn test_mnemonics_are_unique() {
        let labels: HashSet<&str> = Opcode::ALL.iter().map(|op| op.mnemonic()).collect();
        assert_eq!(labels.len(), Opcode::COUNT);
    }

    #[test]
    fn test_operand_masks() {
        assert_eq!(Opcode::Lui.operand_mask(), MASK_RD);
        assert_eq!(Opcode::Sw.operand_mask(), MASK_RS1 | MASK_RS2);
        assert_eq!(Opcode::Add.operand_mask(), MASK_RD | MASK_RS1 | MASK_RS2);
        assert_eq!(Opcode::Ecall.operand_mask(), 0);
        assert_eq!(Opcode::CMv.operand_mask(), MASK_RD | MASK_RS2);
        assert_eq!(Opcode::Unknown.operand_mask(), 0);
    }
}
