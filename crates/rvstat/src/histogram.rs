//! Instruction frequency histogram.
//!
//! One entry per known mnemonic plus a trailing `unknown` entry for words
//! that failed to decode. Entry order is fixed at construction and carried
//! verbatim into the report.

use rvstat_isa::Opcode;

/// One unit produced by the instruction stream walker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InstructionUnit {
    /// The word decoded to a known mnemonic.
    Decoded(Opcode),
    /// The word did not decode; the raw bits are kept for diagnostics.
    Failed(u32),
}

/// One histogram row.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Entry {
    /// Mnemonic label, `"unknown"` for the trailing entry.
    pub mnemonic: &'static str,
    /// Operand-slot usage mask, fixed metadata from the opcode table.
    pub operands: u8,
    /// Running count, only ever incremented.
    pub count: u64,
}

/// Frequency table over the full mnemonic taxonomy.
///
/// Rows follow [`Opcode::ALL`] order, so the row for an opcode lives at
/// [`Opcode::index`] and `unknown` is always last. Single writer; merging
/// partial tables is the only combining operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Histogram {
    entries: Vec<Entry>,
}

impl Histogram {
    /// Build a zeroed table over every opcode.
    #[must_use]
    pub fn new() -> Self {
        let entries = Opcode::ALL
            .iter()
            .map(|op| Entry {
                mnemonic: op.mnemonic(),
                operands: op.operand_mask(),
                count: 0,
            })
            .collect();
        Self { entries }
    }

    /// Count one unit. Failed units land in the trailing `unknown` row.
    pub fn record(&mut self, unit: InstructionUnit) {
        let index = match unit {
            InstructionUnit::Decoded(op) => op.index(),
            InstructionUnit::Failed(_) => Opcode::Unknown.index(),
        };
        self.entries[index].count += 1;
    }

    /// Add another table's counts into this one.
    ///
    /// Associative and commutative, so partial tables from parallel
    /// section scans can merge in any order.
    pub fn merge(&mut self, other: &Self) {
        for (entry, partial) in self.entries.iter_mut().zip(&other.entries) {
            entry.count += partial.count;
        }
    }

    /// Rows in table order.
    #[must_use]
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Sum of all counts, equal to the number of units recorded.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_shape() {
        let hist = Histogram::new();
        assert_eq!(hist.entries().len(), Opcode::COUNT);
        let last = hist.entries().last().unwrap();
        assert_eq!(last.mnemonic, "unknown");
        assert!(hist.entries().iter().all(|e| e.count == 0));
    }

    #[test]
    fn test_record_decoded_and_failed() {
        let mut hist = Histogram::new();
        hist.record(InstructionUnit::Decoded(Opcode::Add));
        hist.record(InstructionUnit::Decoded(Opcode::Add));
        hist.record(InstructionUnit::Failed(0xFFFF_FFFF));

        assert_eq!(hist.entries()[Opcode::Add.index()].count, 2);
        assert_eq!(hist.entries()[Opcode::Unknown.index()].count, 1);
        assert_eq!(hist.total(), 3);
    }

    #[test]
    fn test_merge_sums_counts() {
        let mut a = Histogram::new();
        let mut b = Histogram::new();
        a.record(InstructionUnit::Decoded(Opcode::Lui));
        b.record(InstructionUnit::Decoded(Opcode::Lui));
        b.record(InstructionUnit::Failed(0));

        a.merge(&b);
        assert_eq!(a.entries()[Opcode::Lui.index()].count, 2);
        assert_eq!(a.entries()[Opcode::Unknown.index()].count, 1);
        assert_eq!(a.total(), 3);
    }
}
