//! Shared helpers that assemble synthetic RISC-V ELF images in memory.

pub const SHT_PROGBITS: u32 = 1;
pub const SHT_STRTAB: u32 = 3;
pub const SHF_ALLOC: u64 = 0x2;
pub const SHF_EXECINSTR: u64 = 0x4;

/// One section to place in a synthetic image.
pub struct SectionSpec<'a> {
    pub name: &'a str,
    pub sh_type: u32,
    pub flags: u64,
    pub data: &'a [u8],
}

/// Executable `.text`-style section around `data`.
pub fn text_section(data: &[u8]) -> SectionSpec<'_> {
    named_text_section(".text", data)
}

pub fn named_text_section<'a>(name: &'a str, data: &'a [u8]) -> SectionSpec<'a> {
    SectionSpec {
        name,
        sh_type: SHT_PROGBITS,
        flags: SHF_ALLOC | SHF_EXECINSTR,
        data,
    }
}

pub fn build_elf32(sections: &[SectionSpec<'_>]) -> Vec<u8> {
    build(1, sections)
}

pub fn build_elf64(sections: &[SectionSpec<'_>]) -> Vec<u8> {
    build(2, sections)
}

// Layout: [ehdr | payloads | shstrtab | section headers]. Section 0 is the
// null entry and the string table comes last, so shstrndx = shnum - 1.
fn build(class: u8, sections: &[SectionSpec<'_>]) -> Vec<u8> {
    let is64 = class == 2;
    let ehsize = if is64 { 64 } else { 52 };
    let shentsize: u16 = if is64 { 64 } else { 40 };

    let mut strtab = vec![0u8];
    let mut name_offsets = Vec::new();
    for spec in sections {
        name_offsets.push(strtab.len() as u32);
        strtab.extend_from_slice(spec.name.as_bytes());
        strtab.push(0);
    }
    let shstrtab_name = strtab.len() as u32;
    strtab.extend_from_slice(b".shstrtab\0");

    let mut image = vec![0u8; ehsize];
    let mut payload_offsets = Vec::new();
    for spec in sections {
        payload_offsets.push(image.len() as u64);
        image.extend_from_slice(spec.data);
    }
    let strtab_offset = image.len() as u64;
    image.extend_from_slice(&strtab);
    let shoff = image.len() as u64;

    let shnum = sections.len() as u16 + 2;
    let shstrndx = shnum - 1;

    image[0..4].copy_from_slice(&0x464C_457Fu32.to_le_bytes());
    image[4] = class;
    image[5] = 1; // ELFDATA2LSB
    image[6] = 1; // EV_CURRENT
    image[16..18].copy_from_slice(&2u16.to_le_bytes()); // ET_EXEC
    image[18..20].copy_from_slice(&243u16.to_le_bytes()); // EM_RISCV
    if is64 {
        image[40..48].copy_from_slice(&shoff.to_le_bytes());
        image[58..60].copy_from_slice(&shentsize.to_le_bytes());
        image[60..62].copy_from_slice(&shnum.to_le_bytes());
        image[62..64].copy_from_slice(&shstrndx.to_le_bytes());
    } else {
        image[32..36].copy_from_slice(&(shoff as u32).to_le_bytes());
        image[46..48].copy_from_slice(&shentsize.to_le_bytes());
        image[48..50].copy_from_slice(&shnum.to_le_bytes());
        image[50..52].copy_from_slice(&shstrndx.to_le_bytes());
    }

    let mut push_shdr = |name: u32, sh_type: u32, flags: u64, offset: u64, size: u64| {
        if is64 {
            let mut entry = [0u8; 64];
            entry[0..4].copy_from_slice(&name.to_le_bytes());
            entry[4..8].copy_from_slice(&sh_type.to_le_bytes());
            entry[8..16].copy_from_slice(&flags.to_le_bytes());
            entry[24..32].copy_from_slice(&offset.to_le_bytes());
            entry[32..40].copy_from_slice(&size.to_le_bytes());
            image.extend_from_slice(&entry);
        } else {
            let mut entry = [0u8; 40];
            entry[0..4].copy_from_slice(&name.to_le_bytes());
            entry[4..8].copy_from_slice(&sh_type.to_le_bytes());
            entry[8..12].copy_from_slice(&(flags as u32).to_le_bytes());
            entry[16..20].copy_from_slice(&(offset as u32).to_le_bytes());
            entry[20..24].copy_from_slice(&(size as u32).to_le_bytes());
            image.extend_from_slice(&entry);
        }
    };

    push_shdr(0, 0, 0, 0, 0);
    for (i, spec) in sections.iter().enumerate() {
        push_shdr(
            name_offsets[i],
            spec.sh_type,
            spec.flags,
            payload_offsets[i],
            spec.data.len() as u64,
        );
    }
    push_shdr(shstrtab_name, SHT_STRTAB, 0, strtab_offset, strtab.len() as u64);

    image
}
