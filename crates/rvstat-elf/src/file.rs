//! ELF image parser.

use rvstat_isa::Xlen;

use crate::constants::*;
use crate::header::*;
use crate::{ElfError, Result};

/// Read little-endian u16 from bytes.
#[inline]
fn read_le16(data: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([data[offset], data[offset + 1]])
}

/// Read little-endian u32 from bytes.
#[inline]
fn read_le32(data: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
    ])
}

/// Read little-endian u64 from bytes.
#[inline]
fn read_le64(data: &[u8], offset: usize) -> u64 {
    u64::from_le_bytes([
        data[offset],
        data[offset + 1],
        data[offset + 2],
        data[offset + 3],
        data[offset + 4],
        data[offset + 5],
        data[offset + 6],
        data[offset + 7],
    ])
}

/// Loaded ELF image: owned file bytes plus the decoded section table.
///
/// Section byte views are borrowed from the image and bounds-checked on
/// every cut; the buffer itself is never mutated after parsing.
#[derive(Clone, Debug)]
pub struct ElfImage {
    data: Vec<u8>,
    header: ElfHeader,
    sections: Vec<Section>,
}

/// Raw section-table entry before name resolution.
struct RawSection {
    name_idx: u32,
    sh_type: u32,
    flags: u64,
    addr: u64,
    offset: u64,
    size: u64,
}

impl ElfImage {
    /// Parse an ELF image from its file bytes, taking ownership of them.
    ///
    /// Validates the container: magic, class, little-endian encoding,
    /// RISC-V machine, and a non-empty section table.
    pub fn parse(data: Vec<u8>) -> Result<Self> {
        let header = Self::parse_header(&data)?;
        if header.shnum == 0 {
            return Err(ElfError::NoSections);
        }
        let sections = Self::parse_sections(&data, &header)?;

        Ok(Self {
            data,
            header,
            sections,
        })
    }

    /// The validated file header.
    #[must_use]
    pub fn header(&self) -> &ElfHeader {
        &self.header
    }

    /// Section-table entries in file order.
    #[must_use]
    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    /// Raw file bytes.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Register width implied by the ELF class.
    #[must_use]
    pub const fn xlen(&self) -> Xlen {
        if self.header.class == ELF_CLASS_64 {
            Xlen::Rv64
        } else {
            Xlen::Rv32
        }
    }

    /// Whether the image was built with the C (compressed) extension.
    #[must_use]
    pub const fn is_rvc(&self) -> bool {
        (self.header.flags & EF_RISCV_RVC) != 0
    }

    /// Borrow a section's file bytes.
    ///
    /// Fails if the section's `[offset, offset + size)` range does not lie
    /// inside the file.
    pub fn section_view<'a>(&'a self, section: &'a Section) -> Result<SectionView<'a>> {
        let start = usize::try_from(section.offset).map_err(|_| out_of_bounds(section))?;
        let len = usize::try_from(section.size).map_err(|_| out_of_bounds(section))?;
        let end = start.checked_add(len).ok_or_else(|| out_of_bounds(section))?;
        if end > self.data.len() {
            return Err(out_of_bounds(section));
        }

        Ok(SectionView {
            name: &section.name,
            addr: section.addr,
            data: &self.data[start..end],
        })
    }

    fn parse_header(data: &[u8]) -> Result<ElfHeader> {
        // ELF32 header size; enough to read the identification fields
        if data.len() < 52 {
            return Err(ElfError::TooSmall);
        }

        let magic = read_le32(data, 0);
        if magic != ELF_MAGIC {
            return Err(ElfError::InvalidMagic);
        }

        let class = data[4];
        if class != ELF_CLASS_32 && class != ELF_CLASS_64 {
            return Err(ElfError::UnsupportedClass(class));
        }
        if class == ELF_CLASS_64 && data.len() < 64 {
            return Err(ElfError::TooSmall);
        }

        if data[5] != ELF_DATA_LSB {
            return Err(ElfError::NotLittleEndian);
        }

        let machine = read_le16(data, 18);
        if machine != ELF_MACHINE_RISCV {
            return Err(ElfError::NotRiscv(machine));
        }

        let header = if class == ELF_CLASS_64 {
            ElfHeader {
                magic,
                class,
                data: data[5],
                version: data[6],
                abi: data[7],
                abi_version: data[8],
                machine,
                entry: read_le64(data, 24),
                shoff: read_le64(data, 40),
                flags: read_le32(data, 48),
                shentsize: read_le16(data, 58),
                shnum: read_le16(data, 60),
                shstrndx: read_le16(data, 62),
            }
        } else {
            ElfHeader {
                magic,
                class,
                data: data[5],
                version: data[6],
                abi: data[7],
                abi_version: data[8],
                machine,
                entry: u64::from(read_le32(data, 24)),
                shoff: u64::from(read_le32(data, 32)),
                flags: read_le32(data, 36),
                shentsize: read_le16(data, 46),
                shnum: read_le16(data, 48),
                shstrndx: read_le16(data, 50),
            }
        };

        Ok(header)
    }

    fn parse_sections(data: &[u8], header: &ElfHeader) -> Result<Vec<Section>> {
        let mut raw = Vec::with_capacity(header.shnum as usize);

        let base = usize::try_from(header.shoff).map_err(|_| ElfError::SectionOutOfBounds)?;
        for i in 0..header.shnum {
            let offset = base
                .checked_add(i as usize * header.shentsize as usize)
                .ok_or(ElfError::SectionOutOfBounds)?;
            raw.push(Self::parse_section_entry(data, offset, header.class)?);
        }

        // Resolve names through the section-name string table, if the
        // header points at a plausible one.
        let strtab = raw
            .get(header.shstrndx as usize)
            .map(|s: &RawSection| s.offset);

        let sections = raw
            .iter()
            .map(|s| Section {
                name: strtab.map_or_else(String::new, |tab| {
                    extract_string(data, tab as usize, s.name_idx as usize)
                }),
                sh_type: s.sh_type,
                flags: s.flags,
                addr: s.addr,
                offset: s.offset,
                size: s.size,
            })
            .collect();

        Ok(sections)
    }

    fn parse_section_entry(data: &[u8], offset: usize, class: u8) -> Result<RawSection> {
        if class == ELF_CLASS_64 {
            let end = offset.checked_add(64).ok_or(ElfError::SectionOutOfBounds)?;
            if end > data.len() {
                return Err(ElfError::SectionOutOfBounds);
            }
            Ok(RawSection {
                name_idx: read_le32(data, offset),
                sh_type: read_le32(data, offset + 4),
                flags: read_le64(data, offset + 8),
                addr: read_le64(data, offset + 16),
                offset: read_le64(data, offset + 24),
                size: read_le64(data, offset + 32),
            })
        } else {
            let end = offset.checked_add(40).ok_or(ElfError::SectionOutOfBounds)?;
            if end > data.len() {
                return Err(ElfError::SectionOutOfBounds);
            }
            Ok(RawSection {
                name_idx: read_le32(data, offset),
                sh_type: read_le32(data, offset + 4),
                flags: u64::from(read_le32(data, offset + 8)),
                addr: u64::from(read_le32(data, offset + 12)),
                offset: u64::from(read_le32(data, offset + 16)),
                size: u64::from(read_le32(data, offset + 20)),
            })
        }
    }
}

fn out_of_bounds(section: &Section) -> ElfError {
    ElfError::SectionDataOutOfBounds {
        name: section.name.clone(),
    }
}

/// Extract a NUL-terminated string from a string table.
fn extract_string(data: &[u8], strtab_offset: usize, string_offset: usize) -> String {
    let Some(start) = strtab_offset.checked_add(string_offset) else {
        return String::new();
    };
    let mut result = String::new();

    if start >= data.len() {
        return result;
    }

    for &byte in &data[start..] {
        if byte == 0 {
            break;
        }
        result.push(byte as char);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    // Builds a single-section ELF32: [ehdr | payload | shstrtab | shdrs].
    // Section 0 is the null entry, section 1 the payload, section 2 the
    // string table.
    fn elf32_with_section(sh_type: u32, sh_flags: u32, payload: &[u8]) -> Vec<u8> {
        let payload_off = 52u32;
        let strtab_off = payload_off + payload.len() as u32;
        let strtab: &[u8] = b"\0.text\0.shstrtab\0";
        let shoff = strtab_off + strtab.len() as u32;

        let mut data = vec![0u8; 52];
        data[0..4].copy_from_slice(&ELF_MAGIC.to_le_bytes());
        data[4] = ELF_CLASS_32;
        data[5] = ELF_DATA_LSB;
        data[6] = ELF_VERSION_CURRENT;
        data[18..20].copy_from_slice(&ELF_MACHINE_RISCV.to_le_bytes());
        data[32..36].copy_from_slice(&shoff.to_le_bytes());
        data[46..48].copy_from_slice(&40u16.to_le_bytes());
        data[48..50].copy_from_slice(&3u16.to_le_bytes());
        data[50..52].copy_from_slice(&2u16.to_le_bytes());

        data.extend_from_slice(payload);
        data.extend_from_slice(strtab);

        let mut shdr = |name: u32, ty: u32, flags: u32, off: u32, size: u32| {
            let mut entry = [0u8; 40];
            entry[0..4].copy_from_slice(&name.to_le_bytes());
            entry[4..8].copy_from_slice(&ty.to_le_bytes());
            entry[8..12].copy_from_slice(&flags.to_le_bytes());
            entry[16..20].copy_from_slice(&off.to_le_bytes());
            entry[20..24].copy_from_slice(&size.to_le_bytes());
            data.extend_from_slice(&entry);
        };
        shdr(0, SHT_NULL, 0, 0, 0);
        shdr(1, sh_type, sh_flags, payload_off, payload.len() as u32);
        shdr(7, SHT_STRTAB, 0, strtab_off, strtab.len() as u32);

        data
    }

    #[test]
    fn test_invalid_magic() {
        let data = vec![0u8; 64];
        assert!(matches!(
            ElfImage::parse(data),
            Err(ElfError::InvalidMagic)
        ));
    }

    #[test]
    fn test_too_small() {
        let data = vec![0x7F, 0x45, 0x4C, 0x46];
        assert!(matches!(ElfImage::parse(data), Err(ElfError::TooSmall)));
    }

    #[test]
    fn test_not_little_endian() {
        let mut data = elf32_with_section(SHT_PROGBITS, 0, &[]);
        data[5] = 2; // ELFDATA2MSB
        assert!(matches!(
            ElfImage::parse(data),
            Err(ElfError::NotLittleEndian)
        ));
    }

    #[test]
    fn test_wrong_machine() {
        let mut data = elf32_with_section(SHT_PROGBITS, 0, &[]);
        data[18..20].copy_from_slice(&62u16.to_le_bytes()); // EM_X86_64
        assert!(matches!(
            ElfImage::parse(data),
            Err(ElfError::NotRiscv(62))
        ));
    }

    #[test]
    fn test_zero_section_headers() {
        let mut data = elf32_with_section(SHT_PROGBITS, 0, &[]);
        data[48..50].copy_from_slice(&0u16.to_le_bytes());
        assert!(matches!(ElfImage::parse(data), Err(ElfError::NoSections)));
    }

    #[test]
    fn test_parse_sections_and_names() {
        let payload = vec![0x93, 0x00, 0x10, 0x00]; // ADDI x1, x0, 1
        let data = elf32_with_section(
            SHT_PROGBITS,
            (SHF_ALLOC | SHF_EXECINSTR) as u32,
            &payload,
        );
        let image = ElfImage::parse(data).unwrap();

        assert_eq!(image.xlen(), Xlen::Rv32);
        assert_eq!(image.sections().len(), 3);

        let text = &image.sections()[1];
        assert_eq!(text.name, ".text");
        assert!(text.is_progbits());
        assert!(text.is_executable());

        let view = image.section_view(text).unwrap();
        assert_eq!(view.data, payload.as_slice());
    }

    #[test]
    fn test_section_data_out_of_bounds() {
        let mut data = elf32_with_section(SHT_PROGBITS, SHF_EXECINSTR as u32, &[0u8; 8]);
        // Stretch the payload section past the end of the file
        let shoff = u32::from_le_bytes(data[32..36].try_into().unwrap()) as usize;
        let size_field = shoff + 40 + 20;
        data[size_field..size_field + 4].copy_from_slice(&0x1000_0000u32.to_le_bytes());

        let image = ElfImage::parse(data).unwrap();
        let text = &image.sections()[1];
        assert!(matches!(
            image.section_view(text),
            Err(ElfError::SectionDataOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_truncated_section_table() {
        let mut data = elf32_with_section(SHT_PROGBITS, 0, &[]);
        data.truncate(data.len() - 8);
        assert!(matches!(
            ElfImage::parse(data),
            Err(ElfError::SectionOutOfBounds)
        ));
    }

    #[test]
    fn test_section_table_offset_overflow() {
        // ELF64 header whose section table sits at the top of the address
        // space; the entry bound cannot be formed and must error, not wrap
        let mut data = vec![0u8; 64];
        data[0..4].copy_from_slice(&ELF_MAGIC.to_le_bytes());
        data[4] = ELF_CLASS_64;
        data[5] = ELF_DATA_LSB;
        data[6] = ELF_VERSION_CURRENT;
        data[18..20].copy_from_slice(&ELF_MACHINE_RISCV.to_le_bytes());
        data[40..48].copy_from_slice(&(u64::MAX - 16).to_le_bytes());
        data[58..60].copy_from_slice(&64u16.to_le_bytes());
        data[60..62].copy_from_slice(&1u16.to_le_bytes());

        assert!(matches!(
            ElfImage::parse(data),
            Err(ElfError::SectionOutOfBounds)
        ));
    }

    #[test]
    fn test_section_table_offset_past_end() {
        let mut data = elf32_with_section(SHT_PROGBITS, 0, &[]);
        data[32..36].copy_from_slice(&(u32::MAX - 16).to_le_bytes());
        assert!(matches!(
            ElfImage::parse(data),
            Err(ElfError::SectionOutOfBounds)
        ));
    }
}
