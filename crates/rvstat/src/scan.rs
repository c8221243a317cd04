//! Executable-section scan: stream walker, decode adapter, census driver.

use rayon::prelude::*;
use rvstat_elf::{ElfImage, Section, SectionView};
use rvstat_isa::{InstrWidth, Xlen, decode};
use tracing::debug;

use crate::Result;
use crate::histogram::{Histogram, InstructionUnit};

/// Scan configuration.
#[derive(Clone, Copy, Debug)]
pub struct ScanOptions {
    /// Walk 16-bit compressed instructions. When off, every candidate
    /// word is 4 bytes regardless of its low bits.
    pub rvc: bool,
    /// Scan sections on the rayon pool instead of in sequence.
    pub parallel: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            rvc: true,
            parallel: true,
        }
    }
}

/// Sections holding program-defined executable content, in table order.
pub fn executable_sections(image: &ElfImage) -> impl Iterator<Item = &Section> {
    image
        .sections()
        .iter()
        .filter(|s| s.is_progbits() && s.is_executable())
}

/// Iterator over `(raw word, width)` pairs of one section's byte range.
///
/// The width test reads the 16-bit window at the cursor: low bits other
/// than `0b11` mark a compressed instruction when rvc is on. A truncated
/// trailing word is never read past the end of the slice; iteration stops
/// there instead.
pub struct InsnWindows<'a> {
    data: &'a [u8],
    cursor: usize,
    rvc: bool,
}

impl<'a> InsnWindows<'a> {
    #[must_use]
    pub const fn new(data: &'a [u8], rvc: bool) -> Self {
        Self {
            data,
            cursor: 0,
            rvc,
        }
    }

    /// Bytes consumed so far.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.cursor
    }
}

impl Iterator for InsnWindows<'_> {
    type Item = (u32, InstrWidth);

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.data.len() - self.cursor;
        if remaining < 2 {
            return None;
        }

        let half = u16::from_le_bytes([self.data[self.cursor], self.data[self.cursor + 1]]);
        if self.rvc && (half & 0b11) != 0b11 {
            self.cursor += 2;
            return Some((u32::from(half), InstrWidth::Half));
        }

        if remaining < 4 {
            return None;
        }
        let word = u32::from_le_bytes([
            self.data[self.cursor],
            self.data[self.cursor + 1],
            self.data[self.cursor + 2],
            self.data[self.cursor + 3],
        ]);
        self.cursor += 4;
        Some((word, InstrWidth::Word))
    }
}

/// Decode adapter: total function from raw word to census unit.
#[must_use]
pub fn classify(word: u32, width: InstrWidth, xlen: Xlen) -> InstructionUnit {
    decode(word, width, xlen).map_or(InstructionUnit::Failed(word), InstructionUnit::Decoded)
}

/// Census over every executable section of the image.
///
/// Selection order is section-table order. The parallel path gives each
/// worker a private partial table and merges at the end, so the totals do
/// not depend on worker completion order.
pub fn scan_image(image: &ElfImage, options: &ScanOptions) -> Result<Histogram> {
    let xlen = image.xlen();
    let views = executable_sections(image)
        .map(|section| image.section_view(section))
        .collect::<rvstat_elf::Result<Vec<_>>>()?;

    let histogram = if options.parallel {
        views
            .par_iter()
            .fold(Histogram::new, |mut partial, view| {
                scan_section(view, xlen, options, &mut partial);
                partial
            })
            .reduce(Histogram::new, |mut acc, partial| {
                acc.merge(&partial);
                acc
            })
    } else {
        let mut histogram = Histogram::new();
        for view in &views {
            scan_section(view, xlen, options, &mut histogram);
        }
        histogram
    };

    Ok(histogram)
}

fn scan_section(
    view: &SectionView<'_>,
    xlen: Xlen,
    options: &ScanOptions,
    histogram: &mut Histogram,
) {
    debug!(section = view.name, bytes = view.data.len(), "scanning");
    for (word, width) in InsnWindows::new(view.data, options.rvc) {
        histogram.record(classify(word, width, xlen));
    }
}
