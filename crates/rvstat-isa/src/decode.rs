//! Instruction identity decoder.
//!
//! Maps a raw word to its [`Opcode`] without materializing operands;
//! register and immediate fields are only inspected where the ISA makes an
//! encoding reserved based on their values.

use crate::opcodes::Opcode;
use crate::types::{InstrWidth, Xlen};

/// Decode one raw word into its taxonomy identity.
///
/// Pure and total for the given width and XLEN: any word that is not a
/// recognized encoding yields `None`. A `Half` word carries the candidate in
/// its low 16 bits.
#[must_use]
pub fn decode(word: u32, width: InstrWidth, xlen: Xlen) -> Option<Opcode> {
    match width {
        InstrWidth::Half => decode_compressed(word as u16, xlen),
        InstrWidth::Word => decode_32bit(word, xlen),
    }
}

/// Decode a full 32-bit instruction.
fn decode_32bit(instr: u32, xlen: Xlen) -> Option<Opcode> {
    let funct3 = (instr >> 12) & 0x7;
    let funct7 = (instr >> 25) & 0x7F;

    let op = match instr & 0x7F {
        // LUI
        0x37 => Opcode::Lui,
        // AUIPC
        0x17 => Opcode::Auipc,
        // JAL
        0x6F => Opcode::Jal,
        // JALR
        0x67 if funct3 == 0 => Opcode::Jalr,
        // Branches
        0x63 => match funct3 {
            0 => Opcode::Beq,
            1 => Opcode::Bne,
            4 => Opcode::Blt,
            5 => Opcode::Bge,
            6 => Opcode::Bltu,
            7 => Opcode::Bgeu,
            _ => return None,
        },
        // Loads
        0x03 => match funct3 {
            0 => Opcode::Lb,
            1 => Opcode::Lh,
            2 => Opcode::Lw,
            3 if xlen == Xlen::Rv64 => Opcode::Ld,
            4 => Opcode::Lbu,
            5 => Opcode::Lhu,
            6 if xlen == Xlen::Rv64 => Opcode::Lwu,
            _ => return None,
        },
        // Stores
        0x23 => match funct3 {
            0 => Opcode::Sb,
            1 => Opcode::Sh,
            2 => Opcode::Sw,
            3 if xlen == Xlen::Rv64 => Opcode::Sd,
            _ => return None,
        },
        // OP-IMM
        0x13 => {
            // RV64 shift-immediates widen shamt into funct7 bit 0.
            let shift_funct = match xlen {
                Xlen::Rv32 => funct7,
                Xlen::Rv64 => funct7 & 0x7E,
            };
            match funct3 {
                0 => Opcode::Addi,
                1 if shift_funct == 0x00 => Opcode::Slli,
                2 => Opcode::Slti,
                3 => Opcode::Sltiu,
                4 => Opcode::Xori,
                5 if shift_funct == 0x00 => Opcode::Srli,
                5 if shift_funct == 0x20 => Opcode::Srai,
                6 => Opcode::Ori,
                7 => Opcode::Andi,
                _ => return None,
            }
        }
        // OP-IMM-32 (RV64 only)
        0x1B if xlen == Xlen::Rv64 => match funct3 {
            0 => Opcode::Addiw,
            1 if funct7 == 0x00 => Opcode::Slliw,
            5 if funct7 == 0x00 => Opcode::Srliw,
            5 if funct7 == 0x20 => Opcode::Sraiw,
            _ => return None,
        },
        // OP (funct7 0x01 selects the M extension)
        0x33 => match (funct7, funct3) {
            (0x00, 0) => Opcode::Add,
            (0x20, 0) => Opcode::Sub,
            (0x00, 1) => Opcode::Sll,
            (0x00, 2) => Opcode::Slt,
            (0x00, 3) => Opcode::Sltu,
            (0x00, 4) => Opcode::Xor,
            (0x00, 5) => Opcode::Srl,
            (0x20, 5) => Opcode::Sra,
            (0x00, 6) => Opcode::Or,
            (0x00, 7) => Opcode::And,
            (0x01, 0) => Opcode::Mul,
            (0x01, 1) => Opcode::Mulh,
            (0x01, 2) => Opcode::Mulhsu,
            (0x01, 3) => Opcode::Mulhu,
            (0x01, 4) => Opcode::Div,
            (0x01, 5) => Opcode::Divu,
            (0x01, 6) => Opcode::Rem,
            (0x01, 7) => Opcode::Remu,
            _ => return None,
        },
        // OP-32 (RV64 only)
        0x3B if xlen == Xlen::Rv64 => match (funct7, funct3) {
            (0x00, 0) => Opcode::Addw,
            (0x20, 0) => Opcode::Subw,
            (0x00, 1) => Opcode::Sllw,
            (0x00, 5) => Opcode::Srlw,
            (0x20, 5) => Opcode::Sraw,
            (0x01, 0) => Opcode::Mulw,
            (0x01, 4) => Opcode::Divw,
            (0x01, 5) => Opcode::Divuw,
            (0x01, 6) => Opcode::Remw,
            (0x01, 7) => Opcode::Remuw,
            _ => return None,
        },
        // MISC-MEM
        0x0F => match funct3 {
            0 => Opcode::Fence,
            1 => Opcode::FenceI,
            _ => return None,
        },
        // SYSTEM
        0x73 => match funct3 {
            0 if instr == 0x0000_0073 => Opcode::Ecall,
            0 if instr == 0x0010_0073 => Opcode::Ebreak,
            1 => Opcode::Csrrw,
            2 => Opcode::Csrrs,
            3 => Opcode::Csrrc,
            5 => Opcode::Csrrwi,
            6 => Opcode::Csrrsi,
            7 => Opcode::Csrrci,
            _ => return None,
        },
        // AMO
        0x2F => {
            // Only .W (funct3=2) and, on RV64, .D (funct3=3) widths.
            let wide = match funct3 {
                2 => false,
                3 if xlen == Xlen::Rv64 => true,
                _ => return None,
            };
            match instr >> 27 {
                0x02 if wide => Opcode::LrD,
                0x02 => Opcode::LrW,
                0x03 if wide => Opcode::ScD,
                0x03 => Opcode::ScW,
                0x01 if wide => Opcode::AmoswapD,
                0x01 => Opcode::AmoswapW,
                0x00 if wide => Opcode::AmoaddD,
                0x00 => Opcode::AmoaddW,
                0x04 if wide => Opcode::AmoxorD,
                0x04 => Opcode::AmoxorW,
                0x0C if wide => Opcode::AmoandD,
                0x0C => Opcode::AmoandW,
                0x08 if wide => Opcode::AmoorD,
                0x08 => Opcode::AmoorW,
                0x10 if wide => Opcode::AmominD,
                0x10 => Opcode::AmominW,
                0x14 if wide => Opcode::AmomaxD,
                0x14 => Opcode::AmomaxW,
                0x18 if wide => Opcode::AmominuD,
                0x18 => Opcode::AmominuW,
                0x1C if wide => Opcode::AmomaxuD,
                0x1C => Opcode::AmomaxuW,
                _ => return None,
            }
        }
        _ => return None,
    };

    Some(op)
}

/// Decode a 16-bit compressed instruction.
fn decode_compressed(instr: u16, xlen: Xlen) -> Option<Opcode> {
    let funct3 = (instr >> 13) & 0x7;

    match instr & 0x3 {
        0b00 => decode_compressed_q0(instr, funct3, xlen),
        0b01 => decode_compressed_q1(instr, funct3, xlen),
        0b10 => decode_compressed_q2(instr, funct3, xlen),
        _ => None,
    }
}

/// Quadrant 0: stack-pointer-relative allocation plus register-relative
/// loads and stores of the x8-x15 set.
fn decode_compressed_q0(instr: u16, funct3: u16, xlen: Xlen) -> Option<Opcode> {
    match funct3 {
        // C.ADDI4SPN; an all-zero immediate (covering the defined illegal
        // all-zero word) is reserved.
        0b000 if (instr >> 5) & 0xFF != 0 => Some(Opcode::CAddi4spn),
        // C.LW
        0b010 => Some(Opcode::CLw),
        // C.FLW on RV32 (not in the taxonomy), C.LD on RV64
        0b011 if xlen == Xlen::Rv64 => Some(Opcode::CLd),
        // C.SW
        0b110 => Some(Opcode::CSw),
        // C.FSW on RV32 (not in the taxonomy), C.SD on RV64
        0b111 if xlen == Xlen::Rv64 => Some(Opcode::CSd),
        _ => None,
    }
}

/// Quadrant 1: immediates, control flow, and the misc-ALU block.
fn decode_compressed_q1(instr: u16, funct3: u16, xlen: Xlen) -> Option<Opcode> {
    let rd = (instr >> 7) & 0x1F;
    // CI-format immediate occupies bits [12|6:2].
    let imm_zero = instr & 0x107C == 0;

    match funct3 {
        // C.NOP / C.ADDI
        0b000 if rd == 0 && imm_zero => Some(Opcode::CNop),
        0b000 => Some(Opcode::CAddi),
        // C.JAL on RV32 shares this encoding with C.ADDIW on RV64
        0b001 => match xlen {
            Xlen::Rv32 => Some(Opcode::CJal),
            Xlen::Rv64 if rd != 0 => Some(Opcode::CAddiw),
            Xlen::Rv64 => None,
        },
        // C.LI
        0b010 => Some(Opcode::CLi),
        // C.ADDI16SP (rd=2) / C.LUI; zero immediates are reserved
        0b011 if rd == 2 && !imm_zero => Some(Opcode::CAddi16sp),
        0b011 if rd != 0 && rd != 2 && !imm_zero => Some(Opcode::CLui),
        0b011 => None,
        // Misc ALU
        0b100 => decode_compressed_misc_alu(instr, xlen),
        // C.J
        0b101 => Some(Opcode::CJ),
        // C.BEQZ
        0b110 => Some(Opcode::CBeqz),
        // C.BNEZ
        0b111 => Some(Opcode::CBnez),
        _ => None,
    }
}

/// Quadrant 1 misc-ALU block (funct3 = 100).
fn decode_compressed_misc_alu(instr: u16, xlen: Xlen) -> Option<Opcode> {
    match (instr >> 10) & 0x3 {
        // C.SRLI
        0b00 => Some(Opcode::CSrli),
        // C.SRAI
        0b01 => Some(Opcode::CSrai),
        // C.ANDI
        0b10 => Some(Opcode::CAndi),
        // Register-register: bit 12 splits the RV64-only W forms
        _ => match ((instr >> 12) & 0x1, (instr >> 5) & 0x3) {
            (0, 0b00) => Some(Opcode::CSub),
            (0, 0b01) => Some(Opcode::CXor),
            (0, 0b10) => Some(Opcode::COr),
            (0, 0b11) => Some(Opcode::CAnd),
            (1, 0b00) if xlen == Xlen::Rv64 => Some(Opcode::CSubw),
            (1, 0b01) if xlen == Xlen::Rv64 => Some(Opcode::CAddw),
            _ => None,
        },
    }
}

/// Quadrant 2: stack-pointer-relative loads/stores and register moves.
fn decode_compressed_q2(instr: u16, funct3: u16, xlen: Xlen) -> Option<Opcode> {
    let rd = (instr >> 7) & 0x1F;

    match funct3 {
        // C.SLLI; rd=0 is reserved
        0b000 if rd != 0 => Some(Opcode::CSlli),
        // C.LWSP; rd=0 is reserved
        0b010 if rd != 0 => Some(Opcode::CLwsp),
        // C.FLWSP on RV32 (not in the taxonomy), C.LDSP on RV64
        0b011 if xlen == Xlen::Rv64 && rd != 0 => Some(Opcode::CLdsp),
        // C.JR / C.MV / C.EBREAK / C.JALR / C.ADD
        0b100 => {
            let rs2 = (instr >> 2) & 0x1F;
            match ((instr >> 12) & 0x1, rd, rs2) {
                // C.JR with rs1=0 is reserved
                (0, 0, 0) => None,
                (0, _, 0) => Some(Opcode::CJr),
                (0, _, _) => Some(Opcode::CMv),
                (1, 0, 0) => Some(Opcode::CEbreak),
                (1, _, 0) => Some(Opcode::CJalr),
                (1, _, _) => Some(Opcode::CAdd),
                _ => None,
            }
        }
        // C.SWSP
        0b110 => Some(Opcode::CSwsp),
        // C.FSWSP on RV32 (not in the taxonomy), C.SDSP on RV64
        0b111 if xlen == Xlen::Rv64 => Some(Opcode::CSdsp),
        _ => None,
    }
}
