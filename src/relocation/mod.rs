//! The relocation engine.
//!
//! Walks every relocation table in the image, validates each entry against
//! the resolved symbol table, and hands the patch to the architecture
//! contract. Any failure aborts the whole pass immediately: a partially
//! relocated image is not safe to execute.

pub(crate) mod word;

use crate::{
    Error, Result,
    arch::{RelocApply, Relocator},
    elf::{ElfRel, ElfRela, ElfShdr, ElfSym},
    session::Session,
    table::Table,
};
use elf::abi::{SHT_PROGBITS, SHT_REL, SHT_RELA, SHT_SYMTAB};

impl Session<'_> {
    /// Applies every relocation in the image.
    ///
    /// Must run after [`resolve_symbols`](Session::resolve_symbols)
    /// succeeded: the engine consumes the run-time symbol values that pass
    /// produced. A relocation referencing symbol index zero, or a symbol
    /// whose resolved address is zero, is an error; the check happens
    /// before any byte is written.
    pub fn apply_relocations(&mut self) -> Result<()> {
        #[cfg(feature = "log")]
        log::debug!("applying relocations");

        for (index, entry) in self.shtable().iter().enumerate() {
            let shdr = entry as *const ElfShdr;
            let sh_type = unsafe { (*shdr).sh_type };
            if sh_type == SHT_REL || sh_type == SHT_RELA {
                self.apply_relocation_table(index, shdr)?;
            }
        }

        #[cfg(feature = "log")]
        log::debug!("done applying relocations");

        Ok(())
    }

    fn apply_relocation_table(&self, section: usize, shdr: *const ElfShdr) -> Result<()> {
        let explicit_addend = unsafe { (*shdr).sh_type } == SHT_RELA;
        let reltable = self.section_table(shdr, section, false)?;

        let link = unsafe { (*shdr).sh_link } as usize;
        let sym_hdr = self.section_header(link, Some(SHT_SYMTAB))?;
        let symtab = self.section_table(sym_hdr, link, false)?;

        let info = unsafe { (*shdr).sh_info } as usize;
        let patched_hdr = self.section_header(info, Some(SHT_PROGBITS))?;

        // The patched section as a byte table keeps patch offsets on the
        // same chokepoint as every other index; the architecture layer
        // bounds the whole write width through it, not just the first byte.
        let patched = unsafe {
            Table::bytes(
                (*patched_hdr).sh_addr as usize,
                (*patched_hdr).sh_size as usize,
            )
        };

        #[cfg(feature = "log")]
        log::trace!(
            "relocation table {} patches section {} via symbol table {}",
            section,
            info,
            link
        );

        for (entry, record) in reltable.iter().enumerate() {
            // ElfRel is the common prefix of both record layouts; the
            // addend field exists only in SHT_RELA records.
            let rel = record as *const ElfRel;
            let (r_offset, sym_index, kind) =
                unsafe { ((*rel).r_offset, (*rel).r_symbol(), (*rel).r_type()) };

            if sym_index == 0 {
                return Err(Error::NullSymbolIndex { entry });
            }
            let sym = symtab.get(sym_index)? as *const ElfSym;
            let sym_addr = unsafe { (*sym).st_value } as usize;
            if sym_addr == 0 {
                return Err(Error::NullSymbolAddress { symbol: sym_index });
            }

            let addend = if explicit_addend {
                unsafe { (*(record as *const ElfRela)).r_addend }
            } else {
                0
            };

            #[cfg(feature = "log")]
            log::trace!(
                "relocation kind {} at offset {:#x}: symbol {} at {:#x}, addend {}",
                kind,
                r_offset,
                sym_index,
                sym_addr,
                addend
            );

            Relocator::apply(kind, &patched, r_offset as usize, sym_addr, addend)?;
        }

        Ok(())
    }
}
