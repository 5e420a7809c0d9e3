//! Raw ELF64 structures, laid out exactly as they sit in the image.

use elf::abi::{EI_NIDENT, ELFCLASS64};

/// Size in bytes of the ELF file header.
pub const EHDR_SIZE: usize = size_of::<ElfEhdr>();

/// The ELF class this build of the linker handles.
pub const E_CLASS: u8 = ELFCLASS64;

/// The ELF file header.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct ElfEhdr {
    pub e_ident: [u8; EI_NIDENT],
    pub e_type: u16,
    pub e_machine: u16,
    pub e_version: u32,
    pub e_entry: u64,
    pub e_phoff: u64,
    pub e_shoff: u64,
    pub e_flags: u32,
    pub e_ehsize: u16,
    pub e_phentsize: u16,
    pub e_phnum: u16,
    pub e_shentsize: u16,
    pub e_shnum: u16,
    pub e_shstrndx: u16,
}

/// A section header.
///
/// `sh_addr` is the one mutable field: the section mapper overwrites it with
/// the section's resident run-time address.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct ElfShdr {
    pub sh_name: u32,
    pub sh_type: u32,
    pub sh_flags: u64,
    pub sh_addr: u64,
    pub sh_offset: u64,
    pub sh_size: u64,
    pub sh_link: u32,
    pub sh_info: u32,
    pub sh_addralign: u64,
    pub sh_entsize: u64,
}

/// A symbol table record.
///
/// `st_value` is section-relative on input; the symbol resolver overwrites
/// it with an absolute run-time address (or zero for "no address").
#[repr(C)]
#[derive(Debug, Clone)]
pub struct ElfSym {
    pub st_name: u32,
    pub st_info: u8,
    pub st_other: u8,
    pub st_shndx: u16,
    pub st_value: u64,
    pub st_size: u64,
}

/// A relocation record without an explicit addend (`SHT_REL`).
///
/// Also serves as the common prefix of [`ElfRela`]; the engine reads the
/// addend field only when the owning section's type says it is present.
#[repr(C)]
#[derive(Debug, Clone)]
pub struct ElfRel {
    pub r_offset: u64,
    pub r_info: u64,
}

/// A relocation record with an explicit addend (`SHT_RELA`).
#[repr(C)]
#[derive(Debug, Clone)]
pub struct ElfRela {
    pub r_offset: u64,
    pub r_info: u64,
    pub r_addend: i64,
}

impl ElfRel {
    /// The index of the referenced symbol.
    #[inline]
    pub fn r_symbol(&self) -> usize {
        (self.r_info >> 32) as usize
    }

    /// The relocation kind code.
    #[inline]
    pub fn r_type(&self) -> u32 {
        self.r_info as u32
    }
}

